//! Error types for the prompt-social-rust library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the prompt-social-rust application.
#[derive(Error, Debug)]
pub enum SocialError {
    /// Referenced prompt does not exist (or has a different type)
    #[error("Prompt not found: {0}")]
    PromptNotFound(i64),

    /// User has already liked this prompt
    #[error("User has already liked this prompt")]
    DuplicateLike,

    /// Follow edge already exists
    #[error("Already following this creator")]
    AlreadyFollowing,

    /// Follow edge does not exist
    #[error("Not following this creator")]
    NotFollowing,

    /// Malformed or rejected input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// General error with context
    #[error("{0}")]
    Internal(String),
}

/// Convenience type alias for Result with SocialError
pub type Result<T> = std::result::Result<T, SocialError>;

impl SocialError {
    /// Transport status code the boundary layer maps this error to.
    ///
    /// The HTTP layer itself lives outside this crate; the mapping is kept
    /// here so the taxonomy stays in one place.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::PromptNotFound(_) | Self::NotFollowing => 404,
            Self::DuplicateLike => 409,
            Self::AlreadyFollowing | Self::Validation(_) => 400,
            Self::Database(_) | Self::Pool(_) | Self::Io(_) | Self::InvalidConfig(_) | Self::Internal(_) => 500,
        }
    }
}

impl From<anyhow::Error> for SocialError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SocialError::PromptNotFound(7).status_code(), 404);
        assert_eq!(SocialError::DuplicateLike.status_code(), 409);
        assert_eq!(SocialError::AlreadyFollowing.status_code(), 400);
        assert_eq!(SocialError::NotFollowing.status_code(), 404);
        assert_eq!(SocialError::Validation("bad".to_string()).status_code(), 400);
        assert_eq!(SocialError::Internal("boom".to_string()).status_code(), 500);
    }
}
