//! Error types for the shallow engine.

use thiserror::Error;

/// All possible errors from a diff or merge call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Raised before any field is visited
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Raised while walking fields
    #[error(
        "unsupported embedded field '{field}': {type_name} is neither a record nor an optional record"
    )]
    UnsupportedField {
        field: String,
        type_name: String,
    },
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn unsupported_field(
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Error::UnsupportedField {
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
