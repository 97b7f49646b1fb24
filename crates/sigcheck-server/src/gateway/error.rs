use axum::{
    Json,
    extract::multipart::MultipartError,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use sigcheck::SIGCHECK_STATUS_HEADER;
use sigcheck::verification::VerificationError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("failed to stage upload: {0}")]
    UploadFailed(#[source] std::io::Error),

    #[error("verification failed: {0}")]
    VerificationFailed(#[from] VerificationError),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, sigcheck_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Multipart(e) => {
                let status = e.status();
                if status == StatusCode::PAYLOAD_TOO_LARGE {
                    (status, "payload_too_large")
                } else {
                    (status, "invalid_request")
                }
            }
            GatewayError::UploadFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "upload_error"),
            GatewayError::VerificationFailed(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.kind()),
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            SIGCHECK_STATUS_HEADER,
            HeaderValue::from_str(sigcheck_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
