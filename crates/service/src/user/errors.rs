use thiserror::Error;

use crate::pagination::PaginationError;

/// Business errors for user workflows
#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("user already exists with email: {email}")]
    Conflict { email: String },
    #[error("user not found with id: {id}")]
    NotFound { id: i64 },
    #[error("repository error: {0}")]
    Unexpected(String),
}

impl UserError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            UserError::InvalidInput(_) => 1001,
            UserError::Conflict { .. } => 1002,
            UserError::NotFound { .. } => 1003,
            UserError::Unexpected(_) => 1200,
        }
    }
}

impl From<sea_orm::DbErr> for UserError {
    fn from(e: sea_orm::DbErr) -> Self {
        UserError::Unexpected(e.to_string())
    }
}

impl From<PaginationError> for UserError {
    fn from(e: PaginationError) -> Self {
        UserError::InvalidInput(e.to_string())
    }
}
