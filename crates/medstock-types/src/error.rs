//! Error types for data parsing in medstock-types.

use thiserror::Error;

/// Errors that can occur when parsing inventory data.
///
/// Every malformed date, numeric field, or sale request surfaces as one of
/// these variants. Callers decide how to recover: the store falls back to
/// zero values when loading, and expiry checks treat an unparseable date as
/// never expired.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The expiry date is not three hyphen-separated integers.
    #[error("Invalid expiry date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The expiry date parsed but falls outside the representable calendar.
    #[error("Expiry date '{0}' is out of range")]
    DateOutOfRange(String),

    /// A quantity or price field is not a number.
    #[error("Invalid {field} '{value}'")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw field text.
        value: String,
    },

    /// A purchase request is not of the form `BATCH:QUANTITY`.
    #[error("Invalid sale request '{0}': expected BATCH:QUANTITY")]
    InvalidSaleRequest(String),
}

/// Result type alias using medstock-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
