//! Mapping of value-type validation failures onto [`Error`].

use std::fmt::Display;

use serde_json::json;

use super::Error;

/// A validation failure attributable to one request field.
pub trait FieldViolation: Display {
    /// Offending field in the client's (camelCase) vocabulary, if any.
    fn field(&self) -> Option<&'static str>;

    /// Short machine-readable reason, e.g. `empty` or `too_long`.
    fn reason(&self) -> &'static str;
}

/// Build a `ValidationFailed` error whose details name the field and reason.
///
/// # Examples
/// ```
/// use bookshelf::domain::{ErrorCode, Title, validation_error};
///
/// let err = validation_error(Title::new("").expect_err("blank title"));
/// assert_eq!(err.code(), ErrorCode::ValidationFailed);
/// assert_eq!(err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()), Some("title"));
/// ```
pub fn validation_error(violation: impl FieldViolation) -> Error {
    Error::validation_failed(violation.to_string()).with_details(json!({
        "field": violation.field(),
        "code": violation.reason(),
    }))
}
