//! Request ingestion.
//!
//! This module turns a byte stream into a routed request without ever growing
//! a buffer: a bounded line reader, a header skipper, the request-line parser
//! and a bounded JSON object codec for request bodies.

mod error;
mod json;
mod line;
mod method;
mod request;

// Re-export public items
pub use error::Error;
pub use json::{JsonCodec, JsonObject};
pub use line::{BoundedBuf, LineEnd, read_line, skip_headers};
pub use method::Method;
pub use request::{Request, parse_request_line};
