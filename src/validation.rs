use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Result, SocialError};

/// Account identities are opaque strings, but they travel through logs and
/// SQL, so whitespace and control characters are rejected.
static ACCOUNT_RE: OnceLock<Regex> = OnceLock::new();

fn account_re() -> &'static Regex {
    ACCOUNT_RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // constant pattern, cannot fail to compile
        Regex::new(r"^\S+$").unwrap()
    })
}

fn invalid(msg: impl Into<String>) -> SocialError {
    SocialError::Validation(msg.into())
}

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate an account identity string
    pub fn validate_account(account: &str) -> Result<()> {
        if account.trim().is_empty() {
            return Err(invalid("Account cannot be empty"));
        }

        if account.len() > 128 {
            return Err(invalid("Account too long (max 128 characters)"));
        }

        if !account_re().is_match(account) {
            return Err(invalid("Account contains whitespace or control characters"));
        }

        Ok(())
    }

    /// Validate a post display name
    pub fn validate_post_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(invalid("Post name cannot be empty"));
        }

        if name.len() > 200 {
            return Err(invalid("Post name too long (max 200 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(invalid("Post name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate prompt text
    pub fn validate_prompt_text(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(invalid("Prompt text cannot be empty"));
        }

        Ok(())
    }

    /// Validate comment text. Length is unbounded; only degenerate input is rejected.
    pub fn validate_comment(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(invalid("Comment cannot be empty"));
        }

        if text.contains('\0') {
            return Err(invalid("Comment contains invalid characters"));
        }

        Ok(())
    }

    /// Validate an image reference
    pub fn validate_image_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(invalid("Image URL cannot be empty"));
        }

        if url.len() > 2048 {
            return Err(invalid("Image URL too long (max 2048 characters)"));
        }

        Ok(())
    }

    /// Validate pagination parameters against a configured ceiling
    pub fn validate_pagination(page: u32, page_size: u32, max_page_size: u32) -> Result<()> {
        if page == 0 {
            return Err(invalid("Page numbers start at 1"));
        }

        if page_size == 0 {
            return Err(invalid("Page size must be greater than 0"));
        }

        if page_size > max_page_size {
            return Err(invalid(format!(
                "Page size {page_size} exceeds the maximum of {max_page_size}"
            )));
        }

        Ok(())
    }
}
