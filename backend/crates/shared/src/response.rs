//! Response Envelope
//!
//! Every endpoint answers with one of two JSON shapes:
//!
//! ```json
//! { "status": "Success", "response": { ... } }
//! { "status": "Failed", "errorMessage": "..." }
//! ```

use serde::Serialize;

/// `status` value of a successful envelope
pub const STATUS_SUCCESS: &str = "Success";
/// `status` value of a failed envelope
pub const STATUS_FAILED: &str = "Failed";

/// Success envelope body
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope<T> {
    pub status: &'static str,
    pub response: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(response: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            response,
        }
    }
}

/// Error envelope body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub error_message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILED,
            error_message: message.into(),
        }
    }
}

/// Successful API response: an HTTP status plus the enveloped payload
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    status_code: u16,
    body: SuccessEnvelope<T>,
}

impl<T> ApiResponse<T> {
    /// 200 OK
    pub fn ok(data: T) -> Self {
        Self::with_status(200, data)
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self::with_status(201, data)
    }

    pub fn with_status(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            body: SuccessEnvelope::new(data),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn data(&self) -> &T {
        &self.body.response
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self.body)).into_response()
    }
}
