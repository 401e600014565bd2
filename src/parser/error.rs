//! Error types for request ingestion.

use thiserror::Error;

/// Errors that can occur while reading or decoding a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The request line did not carry both a method and a path.
    #[error("Malformed request line: expected 2 tokens, found {0}")]
    MalformedRequestLine(usize),

    /// The HTTP method is not one this crate knows about.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The byte source ended before a JSON object was complete.
    #[error("Unexpected end of input while reading JSON")]
    UnexpectedEof,

    /// The first significant byte of a JSON document was not `{`.
    #[error("JSON document is not an object")]
    NotAnObject,

    /// The encoded JSON object does not fit in the working buffer.
    #[error("JSON document exceeds the {0}-byte working buffer")]
    Overflow(usize),

    /// Error parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error on the byte source.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
