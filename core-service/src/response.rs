//! JSON envelope returned by the folder listing endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bridge_traits::storage::StorageError;
use serde::{Deserialize, Serialize};

/// Outcome of one listing request.
///
/// A success carries `files`; a failure carries `error` and `error_type`.
/// Absent fields are omitted from the JSON.
///
/// ```
/// use core_service::ListingResponse;
///
/// let body = serde_json::to_string(&ListingResponse::success(vec!["a.pdf".into()])).unwrap();
/// assert_eq!(body, r#"{"success":true,"files":["a.pdf"]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ListingResponse {
    pub fn success(files: Vec<String>) -> Self {
        Self {
            success: true,
            files: Some(files),
            error: None,
            error_type: None,
        }
    }

    pub fn failure(error: &StorageError) -> Self {
        Self {
            success: false,
            files: None,
            error: Some(error.to_string()),
            error_type: Some(error.error_type().to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if self.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ListingResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
