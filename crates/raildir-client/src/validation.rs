//! # Search Input Validation
//!
//! Checks run by the search hooks before any request is made. Each check
//! returns the first failing rule as a [`ValidationError`] whose message is
//! shown to the user verbatim.
//!
//! ## Usage
//!
//! ```rust
//! use raildir_client::validation::validate_name_query;
//!
//! assert_eq!(validate_name_query("  O'Brien ").unwrap(), "O'Brien");
//! assert!(validate_name_query("<script>").is_err());
//! ```

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Letters, digits, whitespace, hyphen, apostrophe, period and comma.
pub static NAME_QUERY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-'.,]+$").expect("Invalid regex"));

/// Digits, plus, hyphen, whitespace and parentheses.
pub static PHONE_QUERY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-\s()]+$").expect("Invalid regex"));

/// Maximum length of a name query, in characters.
pub const MAX_NAME_QUERY_LENGTH: usize = 100;

/// Maximum length of a phone query, in characters.
pub const MAX_PHONE_QUERY_LENGTH: usize = 20;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Validates a name search query and returns it trimmed.
pub fn validate_name_query(query: &str) -> Result<&str, ValidationError> {
    let query = query.trim();

    if query.is_empty() {
        return Err(error("required", "Search query is required"));
    }

    if query.chars().count() > MAX_NAME_QUERY_LENGTH {
        return Err(error("length", "Search query must be less than 100 characters"));
    }

    if !NAME_QUERY_REGEX.is_match(query) {
        return Err(error("pattern", "Invalid characters in search query"));
    }

    Ok(query)
}

/// Validates a phone search query and returns it trimmed.
pub fn validate_phone_query(phone: &str) -> Result<&str, ValidationError> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(error("required", "Phone number is required"));
    }

    if phone.chars().count() > MAX_PHONE_QUERY_LENGTH {
        return Err(error("length", "Phone number must be less than 20 characters"));
    }

    if !PHONE_QUERY_REGEX.is_match(phone) {
        return Err(error("pattern", "Invalid phone number format"));
    }

    Ok(phone)
}

/// The user-facing text of a validation failure.
pub fn message(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map_or_else(|| err.code.to_string(), ToString::to_string)
}
