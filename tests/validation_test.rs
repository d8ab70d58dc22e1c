//! Comprehensive unit tests for validation.rs module

use prompt_social_rust::validation::InputValidator;

#[test]
fn test_validate_account_valid() {
    assert!(InputValidator::validate_account("0xabc123").is_ok());
}

#[test]
fn test_validate_account_empty() {
    assert!(InputValidator::validate_account("").is_err());
}

#[test]
fn test_validate_account_whitespace_only() {
    assert!(InputValidator::validate_account("   ").is_err());
}

#[test]
fn test_validate_account_with_inner_space() {
    assert!(InputValidator::validate_account("acc ount").is_err());
}

#[test]
fn test_validate_account_with_newline() {
    assert!(InputValidator::validate_account("acc\nount").is_err());
}

#[test]
fn test_validate_account_too_long() {
    let long_account = "a".repeat(129);
    assert!(InputValidator::validate_account(&long_account).is_err());
}

#[test]
fn test_validate_account_exactly_128_chars() {
    let account = "a".repeat(128);
    assert!(InputValidator::validate_account(&account).is_ok());
}

#[test]
fn test_validate_post_name_valid() {
    assert!(InputValidator::validate_post_name("Neon Skyline #4").is_ok());
}

#[test]
fn test_validate_post_name_empty() {
    assert!(InputValidator::validate_post_name("").is_err());
}

#[test]
fn test_validate_post_name_too_long() {
    let long_name = "a".repeat(201);
    assert!(InputValidator::validate_post_name(&long_name).is_err());
}

#[test]
fn test_validate_post_name_with_null_byte() {
    assert!(InputValidator::validate_post_name("bad\0name").is_err());
}

#[test]
fn test_validate_comment_valid() {
    assert!(InputValidator::validate_comment("love the palette").is_ok());
}

#[test]
fn test_validate_comment_blank() {
    assert!(InputValidator::validate_comment("   ").is_err());
}

#[test]
fn test_validate_comment_unbounded_length() {
    // Comment length is deliberately unbounded.
    let long_comment = "a".repeat(100_000);
    assert!(InputValidator::validate_comment(&long_comment).is_ok());
}

#[test]
fn test_validate_comment_with_null_byte() {
    assert!(InputValidator::validate_comment("bad\0comment").is_err());
}

#[test]
fn test_validate_prompt_text_valid() {
    assert!(InputValidator::validate_prompt_text("a fox in the snow").is_ok());
}

#[test]
fn test_validate_prompt_text_blank() {
    assert!(InputValidator::validate_prompt_text(" ").is_err());
}

#[test]
fn test_validate_image_url_valid() {
    assert!(InputValidator::validate_image_url("ipfs://QmExample").is_ok());
}

#[test]
fn test_validate_image_url_empty() {
    assert!(InputValidator::validate_image_url("").is_err());
}

#[test]
fn test_validate_image_url_too_long() {
    let long_url = format!("ipfs://{}", "a".repeat(2048));
    assert!(InputValidator::validate_image_url(&long_url).is_err());
}

#[test]
fn test_validate_pagination_valid() {
    assert!(InputValidator::validate_pagination(1, 10, 100).is_ok());
    assert!(InputValidator::validate_pagination(50, 100, 100).is_ok());
}

#[test]
fn test_validate_pagination_page_zero() {
    assert!(InputValidator::validate_pagination(0, 10, 100).is_err());
}

#[test]
fn test_validate_pagination_size_zero() {
    assert!(InputValidator::validate_pagination(1, 0, 100).is_err());
}

#[test]
fn test_validate_pagination_size_over_max() {
    assert!(InputValidator::validate_pagination(1, 101, 100).is_err());
}
