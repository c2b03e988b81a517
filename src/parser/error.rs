//! Errors produced while decoding a module.

use std::fmt;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Which header word failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Magic,
    Version,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::Magic => write!(f, "magic number"),
            HeaderField::Version => write!(f, "version"),
        }
    }
}

/// Fatal decode failure. Any of these aborts the whole decode call; no
/// partial module is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("input too short: {len} bytes, a module header needs 8")]
    TooShort { len: usize },

    #[error("unexpected end of input at offset {offset:#x}")]
    UnexpectedEof { offset: usize },

    #[error("integer representation too long at offset {offset:#x}")]
    IntegerTooLong { offset: usize },

    #[error("invalid header: unexpected {field} {value:#x}")]
    InvalidHeader { field: HeaderField, value: u32 },

    #[error("unexpected type form {form:#04x} at offset {offset:#x}, expected 0x60")]
    InvalidTypeForm { form: u8, offset: usize },

    #[error("malformed UTF-8 encoding at offset {offset:#x}")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: FromUtf8Error,
    },

    #[error("invalid value type {byte:#04x} at offset {offset:#x}")]
    InvalidValueType { byte: u8, offset: usize },

    #[error("invalid block type {value} at offset {offset:#x}")]
    InvalidBlockType { value: i64, offset: usize },

    #[error("too many {what} at offset {offset:#x}: {count} exceeds limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        count: u64,
        limit: u32,
        offset: usize,
    },
}

impl DecodeError {
    /// Byte offset into the input the error refers to, where one is known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::TooShort { .. } => None,
            DecodeError::InvalidHeader { field, .. } => match field {
                HeaderField::Magic => Some(0),
                HeaderField::Version => Some(4),
            },
            DecodeError::UnexpectedEof { offset }
            | DecodeError::IntegerTooLong { offset }
            | DecodeError::InvalidTypeForm { offset, .. }
            | DecodeError::InvalidUtf8 { offset, .. }
            | DecodeError::InvalidValueType { offset, .. }
            | DecodeError::InvalidBlockType { offset, .. }
            | DecodeError::LimitExceeded { offset, .. } => Some(*offset),
        }
    }
}
