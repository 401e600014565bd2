//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::server::response::StatusCode;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reading or decoding the request, or a document from the store.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Method not allowed for the requested resource.
    #[error("Method {0} not allowed for path: {1}")]
    MethodNotAllowed(String, String),

    /// The request body is well-formed JSON but not what the resource expects.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A document the response is built from is not in the store.
    #[error("Document unavailable: {0}")]
    MissingDocument(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl Error {
    /// The status reported to the client, or `None` if the connection should
    /// be dropped without a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::NotFound(_) => Some(StatusCode::NotFound),
            Error::MethodNotAllowed(..) => Some(StatusCode::MethodNotAllowed),
            Error::BadRequest(_) => Some(StatusCode::BadRequest),
            Error::ParseError(ParserError::MalformedRequestLine(_)) => None,
            Error::ParseError(_) | Error::MissingDocument(_) => {
                Some(StatusCode::InternalServerError)
            }
            Error::IoError(_) | Error::ConfigError(_) => None,
        }
    }
}
