//! Records `http_requests_total{method,path,status}` and
//! `http_request_duration_seconds{method,path}`.
//!
//! `path` is the matched route template, so `/api/v1/venues/{venue_id}`
//! stays one series no matter how many venues exist.

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

const UNMATCHED: &str = "unmatched";

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED.to_owned(), |mp| mp.as_str().to_owned());

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(elapsed);

    response
}
