//! Error types
//!
//! Field access on HTSP messages reports problems as `FieldError` values so
//! the merge and build paths can log and skip instead of aborting. The codec
//! has its own `HtsmsgError`. `Error` wraps both for callers that want a
//! single type.

use std::fmt;

/// Result alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// A message field was missing or had the wrong type
    Field(FieldError),
    /// HTSMSG encoding/decoding failed
    Htsmsg(HtsmsgError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Field(e) => write!(f, "Field error: {}", e),
            Error::Htsmsg(e) => write!(f, "HTSMSG error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Field(e) => Some(e),
            Error::Htsmsg(e) => Some(e),
        }
    }
}

impl From<FieldError> for Error {
    fn from(e: FieldError) -> Self {
        Error::Field(e)
    }
}

impl From<HtsmsgError> for Error {
    fn from(e: HtsmsgError) -> Self {
        Error::Htsmsg(e)
    }
}

/// Typed field access failure on an `HtsMessage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is not present
    Missing(String),
    /// Field is present but holds a different value type
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    /// Integer field does not fit the requested type
    OutOfRange { field: String, value: i64 },
}

impl FieldError {
    /// Name of the field the error refers to
    pub fn field(&self) -> &str {
        match self {
            FieldError::Missing(field) => field,
            FieldError::TypeMismatch { field, .. } => field,
            FieldError::OutOfRange { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Missing(field) => write!(f, "missing field '{}'", field),
            FieldError::TypeMismatch { field, expected } => {
                write!(f, "field '{}' is not of type {}", field, expected)
            }
            FieldError::OutOfRange { field, value } => {
                write!(f, "field '{}' value {} out of range", field, value)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// HTSMSG codec error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtsmsgError {
    /// Buffer ended before the declared length
    UnexpectedEof,
    /// Field name or string value is not valid UTF-8
    InvalidUtf8,
    /// Unknown field type byte (strict mode only)
    UnknownFieldType(u8),
    /// Nested maps/lists exceed the depth limit
    NestingTooDeep,
    /// Frame length exceeds the decoder limit
    FrameTooLarge(usize),
    /// Field name longer than 255 bytes
    NameTooLong(usize),
}

impl fmt::Display for HtsmsgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtsmsgError::UnexpectedEof => write!(f, "unexpected end of data"),
            HtsmsgError::InvalidUtf8 => write!(f, "invalid UTF-8"),
            HtsmsgError::UnknownFieldType(t) => write!(f, "unknown field type 0x{:02x}", t),
            HtsmsgError::NestingTooDeep => write!(f, "nesting too deep"),
            HtsmsgError::FrameTooLarge(len) => write!(f, "frame of {} bytes too large", len),
            HtsmsgError::NameTooLong(len) => write!(f, "field name of {} bytes too long", len),
        }
    }
}

impl std::error::Error for HtsmsgError {}
