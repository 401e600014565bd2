//! HTTP response types and the response emitter.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// HTTP status codes with their standard reason phrases.
///
/// These are the only statuses the server ever produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Continue = 100,
    Ok = 200,
    NoContent = 204,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    InternalServerError = 500,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Continue => "Continue",
            StatusCode::Ok => "OK",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// The full status line, CRLF included.
    pub fn status_line(&self) -> &'static str {
        match self {
            StatusCode::Continue => "HTTP/1.1 100 Continue\r\n",
            StatusCode::Ok => "HTTP/1.1 200 OK\r\n",
            StatusCode::NoContent => "HTTP/1.1 204 No Content\r\n",
            StatusCode::BadRequest => "HTTP/1.1 400 Bad Request\r\n",
            StatusCode::NotFound => "HTTP/1.1 404 Not Found\r\n",
            StatusCode::MethodNotAllowed => "HTTP/1.1 405 Method Not Allowed\r\n",
            StatusCode::InternalServerError => "HTTP/1.1 500 Internal Server Error\r\n",
        }
    }

    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Body media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Json,
}

impl ContentType {
    /// The full header line, CRLF included.
    pub fn header_line(&self) -> &'static str {
        match self {
            ContentType::Html => "Content-Type: text/html; charset=UTF-8\r\n",
            ContentType::Json => "Content-Type: application/json; charset=UTF-8\r\n",
        }
    }
}

/// Where a response body comes from.
#[derive(Debug)]
pub enum Body<R> {
    Empty,
    /// A stored document, streamed as is.
    Document(R),
    /// A stored document wrapped as the single element of a JSON array.
    Collection(R),
    /// An encoded JSON document, terminated with CRLF on the wire.
    Json(Vec<u8>),
}

/// What happens once a response has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterReply {
    Close,
    /// Close the connection, then restart the device.
    Restart,
}

/// A response ready to be emitted.
#[derive(Debug)]
pub struct Reply<R> {
    pub status: StatusCode,
    pub content_type: Option<ContentType>,
    pub body: Body<R>,
    pub after: AfterReply,
}

impl<R> Reply<R> {
    /// A bodiless response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            body: Body::Empty,
            after: AfterReply::Close,
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_body(mut self, body: Body<R>) -> Self {
        self.body = body;
        self
    }

    pub fn then_restart(mut self) -> Self {
        self.after = AfterReply::Restart;
        self
    }
}

/// Writes responses through a single fixed-size working buffer.
///
/// No write ever hands the output more bytes than the working buffer holds:
/// constants longer than the buffer go out as several chunks, each copied in
/// and flushed before the next.
#[derive(Debug)]
pub struct Emitter {
    chunk: Box<[u8]>,
}

impl Emitter {
    pub fn new(capacity: usize) -> Self {
        Self {
            chunk: vec![0; capacity.max(1)].into_boxed_slice(),
        }
    }

    /// Transfer `text` in chunks no larger than the working buffer.
    pub async fn write_constant<W>(&mut self, out: &mut W, text: &[u8]) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        for piece in text.chunks(self.chunk.len()) {
            let chunk = &mut self.chunk[..piece.len()];
            chunk.copy_from_slice(piece);
            out.write_all(chunk).await?;
            out.flush().await?;
        }
        Ok(())
    }

    /// Copy `source` to `out` until the source is exhausted.
    pub async fn stream<R, W>(&mut self, source: &mut R, out: &mut W) -> io::Result<u64>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut total = 0;
        loop {
            let n = source.read(&mut self.chunk).await?;
            if n == 0 {
                return Ok(total);
            }
            out.write_all(&self.chunk[..n]).await?;
            total += n as u64;
        }
    }

    /// Write a complete response: status line, content type, blank line, body.
    pub async fn send<R, W>(&mut self, out: &mut W, reply: Reply<R>) -> io::Result<AfterReply>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.write_constant(out, reply.status.status_line().as_bytes())
            .await?;
        if let Some(content_type) = reply.content_type {
            self.write_constant(out, content_type.header_line().as_bytes())
                .await?;
        }
        self.write_constant(out, b"\r\n").await?;

        match reply.body {
            Body::Empty => {}
            Body::Document(mut source) => {
                self.stream(&mut source, out).await?;
            }
            Body::Collection(mut source) => {
                self.write_constant(out, b"[\r\n").await?;
                self.stream(&mut source, out).await?;
                self.write_constant(out, b"]\r\n").await?;
            }
            Body::Json(encoded) => {
                self.write_constant(out, &encoded).await?;
                self.write_constant(out, b"\r\n").await?;
            }
        }

        out.flush().await?;
        Ok(reply.after)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;

    /// Records the size of every write it receives.
    #[derive(Default)]
    struct RecordingWriter {
        data: Vec<u8>,
        writes: Vec<usize>,
    }

    impl AsyncWrite for RecordingWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            this.data.extend_from_slice(buf);
            this.writes.push(buf.len());
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_long_constant_is_chunked() {
        let mut emitter = Emitter::new(16);
        let mut out = RecordingWriter::default();
        let text = StatusCode::InternalServerError.status_line();

        emitter.write_constant(&mut out, text.as_bytes()).await.unwrap();

        assert_eq!(out.data, text.as_bytes());
        assert_eq!(out.writes, vec![16, 16, 4]);
    }

    #[tokio::test]
    async fn test_short_constant_is_one_write() {
        let mut emitter = Emitter::new(81);
        let mut out = RecordingWriter::default();

        emitter
            .write_constant(&mut out, ContentType::Json.header_line().as_bytes())
            .await
            .unwrap();
        assert_eq!(out.writes.len(), 1);
    }

    #[tokio::test]
    async fn test_send_document() {
        let mut emitter = Emitter::new(8);
        let mut out = RecordingWriter::default();
        let reply = Reply::new(StatusCode::Ok)
            .with_content_type(ContentType::Html)
            .with_body(Body::Document(Cursor::new(b"<p>hello, world</p>".to_vec())));

        let after = emitter.send(&mut out, reply).await.unwrap();

        assert_eq!(after, AfterReply::Close);
        assert_eq!(
            String::from_utf8(out.data).unwrap(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n<p>hello, world</p>"
        );
        assert!(out.writes.iter().all(|&n| n <= 8));
    }

    #[tokio::test]
    async fn test_send_collection() {
        let mut emitter = Emitter::new(81);
        let mut out = RecordingWriter::default();
        let reply = Reply::new(StatusCode::Ok)
            .with_content_type(ContentType::Json)
            .with_body(Body::Collection(Cursor::new(b"{}".to_vec())));

        emitter.send(&mut out, reply).await.unwrap();

        assert_eq!(
            String::from_utf8(out.data).unwrap(),
            "HTTP/1.1 200 OK\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n[\r\n{}]\r\n"
        );
    }

    #[tokio::test]
    async fn test_send_restart_reply() {
        let mut emitter = Emitter::new(81);
        let mut out = RecordingWriter::default();
        let reply: Reply<Cursor<Vec<u8>>> = Reply::new(StatusCode::NoContent).then_restart();

        let after = emitter.send(&mut out, reply).await.unwrap();

        assert_eq!(after, AfterReply::Restart);
        assert_eq!(out.data, b"HTTP/1.1 204 No Content\r\n\r\n");
    }

    #[test]
    fn test_status_lines_agree_with_codes() {
        for status in [
            StatusCode::Continue,
            StatusCode::Ok,
            StatusCode::NoContent,
            StatusCode::BadRequest,
            StatusCode::NotFound,
            StatusCode::MethodNotAllowed,
            StatusCode::InternalServerError,
        ] {
            let expected = format!("HTTP/1.1 {} {}\r\n", status.as_u16(), status.reason_phrase());
            assert_eq!(status.status_line(), expected);
        }
    }
}
