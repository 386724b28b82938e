//! Error types for document canonicalization.
//!
//! ## Error Categories
//!
//! - **Decode**: malformed input document; aborts the whole invocation with
//!   the underlying parser message attached
//! - **Encode**: failure while serializing a canonicalized document; aborts
//! - **Io**: stream read failure at the library boundary
//!
//! Embedded-script parse failures are deliberately *not* represented here:
//! they are recovered locally (the `script` field is left untouched) and
//! never surfaced to the caller.

use std::fmt;
use thiserror::Error;

/// All errors that can abort a formatting invocation.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input stream does not contain well-formed documents.
    #[error("cannot decode document: {0}")]
    Decode(String),

    /// A canonicalized tree could not be serialized.
    #[error("cannot encode document: {0}")]
    Encode(String),

    /// Reading the input stream failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a decode error from the underlying parser message.
    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode(msg.to_string())
    }

    /// Creates an encode error.
    pub fn encode<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }

    /// Creates an I/O error for stream read failures.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
