//! `Json<T>` plus `validator::Validate`
//!
//! Malformed bodies are rejected with 400, bodies that parse but fail
//! validation with 422 and a `field: message` list.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(errors) => {
                let mut field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| {
                            let msg = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{:?}", e.code));
                            format!("{}: {}", field, msg)
                        })
                    })
                    .collect();
                field_errors.sort();

                let message = if field_errors.is_empty() {
                    "Validation failed".to_string()
                } else {
                    field_errors.join("; ")
                };

                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct GuestBody {
        #[validate(length(min = 1, max = 10))]
        name: String,
        #[validate(range(min = 1, max = 20))]
        guests: u32,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<GuestBody>) -> &'static str {
        "ok"
    }

    async fn post_raw(body: impl Into<Body>) -> StatusCode {
        let app = Router::new().route("/guests", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/guests")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn accepts_a_valid_body() {
        let body = serde_json::json!({"name": "Ana", "guests": 4});
        assert_eq!(post_raw(body.to_string()).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        assert_eq!(post_raw("{not json").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_validation_is_unprocessable() {
        let body = serde_json::json!({"name": "", "guests": 0});
        assert_eq!(post_raw(body.to_string()).await, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
