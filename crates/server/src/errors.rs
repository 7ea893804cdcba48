use axum::extract::rejection::{JsonRejection, PathRejection};
use axum_extra::extract::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use service::user::errors::UserError;
use tracing::{error, warn};

pub const UNEXPECTED_MESSAGE: &str = "an unexpected error occurred";

/// Error body shared by every failing request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { message: self.message })).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::InvalidInput(_) => Self::bad_request(e.to_string()),
            UserError::Conflict { .. } => Self::new(StatusCode::CONFLICT, e.to_string()),
            UserError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            UserError::Unexpected(_) => {
                // Details stay in the log.
                error!(code = e.code(), error = %e, "unexpected user service failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_MESSAGE)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        warn!(error = %r.body_text(), "rejected json body");
        Self::bad_request(r.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        Self::bad_request(r.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        Self::bad_request(r.to_string())
    }
}
