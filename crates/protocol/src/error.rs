//! Protocol error types

use thiserror::Error;

/// Protocol-level errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A speed argument that is not one of `slow`, `fast` or `off`
    #[error("Unknown speed '{value}' for {field} (expected slow, fast or off)")]
    UnknownSpeed { field: &'static str, value: String },
}

/// Type alias for protocol results
pub type Result<T> = std::result::Result<T, ProtocolError>;
