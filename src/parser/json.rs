//! Bounded JSON object codec.
//!
//! Request bodies carry no length framing the server trusts, so an object is
//! read straight off the stream by tracking brace depth until the outermost
//! `}` closes. The encoded object must fit in a small working buffer sized at
//! startup; anything larger is rejected rather than grown into.

use serde_json::{Map, Value};
use tokio::io::AsyncRead;

use crate::parser::error::Error;
use crate::parser::line::next_byte;

/// A JSON object as handed to resource handlers.
pub type JsonObject = Map<String, Value>;

/// Parses JSON objects from byte streams through a fixed working buffer.
#[derive(Debug)]
pub struct JsonCodec {
    buffer: Vec<u8>,
    capacity: usize,
}

impl JsonCodec {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Read one JSON object from `source`.
    ///
    /// Leading whitespace is skipped. Reading stops right after the closing
    /// brace of the top-level object, leaving any trailing bytes unread.
    ///
    /// # Errors
    ///
    /// * [`Error::UnexpectedEof`] if the source ends first.
    /// * [`Error::NotAnObject`] if the document does not start with `{`.
    /// * [`Error::Overflow`] if the object is longer than the working buffer.
    /// * [`Error::JsonError`] if the captured bytes are not valid JSON.
    pub async fn parse_object<R>(&mut self, source: &mut R) -> Result<JsonObject, Error>
    where
        R: AsyncRead + Unpin,
    {
        self.buffer.clear();

        let first = loop {
            match next_byte(source).await? {
                None => return Err(Error::UnexpectedEof),
                Some(byte) if byte.is_ascii_whitespace() => continue,
                Some(byte) => break byte,
            }
        };
        if first != b'{' {
            return Err(Error::NotAnObject);
        }
        self.store(first)?;

        let mut depth = 1usize;
        let mut in_string = false;
        let mut escaped = false;
        while depth > 0 {
            let byte = next_byte(source).await?.ok_or(Error::UnexpectedEof)?;
            self.store(byte)?;

            if in_string {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => depth -= 1,
                _ => {}
            }
        }

        Ok(serde_json::from_slice(&self.buffer)?)
    }

    /// Encode an object for the wire.
    pub fn serialize(&self, object: &JsonObject) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(object)?)
    }

    fn store(&mut self, byte: u8) -> Result<(), Error> {
        if self.buffer.len() >= self.capacity {
            return Err(Error::Overflow(self.capacity));
        }
        self.buffer.push(byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tokio::io::AsyncReadExt;

    use super::*;

    #[tokio::test]
    async fn test_parse_object_stops_at_closing_brace() {
        let mut codec = JsonCodec::new(64);
        let mut source = Cursor::new(b"  {\"on\":true}trailing".to_vec());

        let object = codec.parse_object(&mut source).await.unwrap();
        assert_eq!(object.get("on"), Some(&Value::Bool(true)));

        let mut rest = String::new();
        source.read_to_string(&mut rest).await.unwrap();
        assert_eq!(rest, "trailing");
    }

    #[tokio::test]
    async fn test_braces_inside_strings_are_ignored() {
        let mut codec = JsonCodec::new(64);
        let mut source = Cursor::new(br#"{"name":"a}\"{b","args":[1,{"x":2}]}"#.to_vec());

        let object = codec.parse_object(&mut source).await.unwrap();
        assert_eq!(object.get("name"), Some(&Value::from("a}\"{b")));
    }

    #[tokio::test]
    async fn test_overflow() {
        let mut codec = JsonCodec::new(8);
        let mut source = Cursor::new(b"{\"name\":\"reboot\"}".to_vec());

        let result = codec.parse_object(&mut source).await;
        assert!(matches!(result, Err(Error::Overflow(8))));
    }

    #[tokio::test]
    async fn test_not_an_object() {
        let mut codec = JsonCodec::new(32);
        let mut source = Cursor::new(b"[true]".to_vec());

        let result = codec.parse_object(&mut source).await;
        assert!(matches!(result, Err(Error::NotAnObject)));
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let mut codec = JsonCodec::new(32);
        let mut source = Cursor::new(b"{\"on\":tr".to_vec());

        let result = codec.parse_object(&mut source).await;
        assert!(matches!(result, Err(Error::UnexpectedEof)));

        let mut empty = Cursor::new(Vec::new());
        let result = codec.parse_object(&mut empty).await;
        assert!(matches!(result, Err(Error::UnexpectedEof)));
    }

    #[tokio::test]
    async fn test_syntax_error() {
        let mut codec = JsonCodec::new(32);
        let mut source = Cursor::new(b"{on:true}".to_vec());

        let result = codec.parse_object(&mut source).await;
        assert!(matches!(result, Err(Error::JsonError(_))));
    }
}
