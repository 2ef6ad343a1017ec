//! Response envelope and request extractors shared by all handlers

mod validated_json;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Every REST endpoint wraps its payload in this envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Payload for operations that return nothing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}
