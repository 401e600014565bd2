//! Request-line parsing and the borrowed request view.

use crate::parser::error::Error;
use crate::parser::line::BoundedBuf;
use crate::parser::method::Method;

/// A parsed request: method and path, borrowed from the connection buffers.
///
/// Both fields may be truncated copies of what the client sent. The protocol
/// version and all headers are discarded before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// The raw method token, in whatever case the client used.
    pub method: &'a str,
    /// The request path.
    pub path: &'a str,
}

impl<'a> Request<'a> {
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self { method, path }
    }

    /// Whether the request uses `method`, ignoring ASCII case.
    pub fn is(&self, method: Method) -> bool {
        method.matches(self.method)
    }
}

/// Split a request line into method and path tokens.
///
/// Tokens are separated by ASCII whitespace. The first two are copied into
/// `method` and `path`, each truncated silently to its buffer's capacity; a
/// third token (the protocol version) and anything after it is ignored.
///
/// # Errors
///
/// Returns [`Error::MalformedRequestLine`] with the number of tokens found
/// when fewer than two are present.
pub fn parse_request_line(
    line: &[u8],
    method: &mut BoundedBuf,
    path: &mut BoundedBuf,
) -> Result<(), Error> {
    let mut tokens = line
        .split(|byte| byte.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    let Some(method_token) = tokens.next() else {
        return Err(Error::MalformedRequestLine(0));
    };
    let Some(path_token) = tokens.next() else {
        return Err(Error::MalformedRequestLine(1));
    };

    method.set(method_token);
    path.set(path_token);
    Ok(())
}
