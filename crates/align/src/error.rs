use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    /// Invalid alignment policy value (negative window or tolerance).
    #[error("config error: {field} must be a non-negative integer, got {value}")]
    Config { field: &'static str, value: i64 },
}
