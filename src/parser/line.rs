//! Bounded line reading.
//!
//! Every line of a request (the request line and each header line) is read into
//! a [`BoundedBuf`] whose capacity is fixed when the server starts. One slot of
//! that capacity is reserved for a terminating NUL, so a buffer of capacity `C`
//! holds at most `C - 1` bytes of content. Bytes past that point are dropped and
//! the reader keeps consuming until the end of the line, so a truncated line
//! never bleeds into the next read.

use std::io;
use std::str;

use tokio::io::{AsyncRead, AsyncReadExt};

/// A fixed-capacity byte buffer that truncates instead of growing.
#[derive(Debug, Clone)]
pub struct BoundedBuf {
    bytes: Box<[u8]>,
    len: usize,
}

impl BoundedBuf {
    /// Allocate a buffer able to hold `capacity - 1` content bytes plus a NUL.
    ///
    /// A capacity of zero is raised to one, which leaves room for the NUL only.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity.max(1)].into_boxed_slice(),
            len: 0,
        }
    }

    /// Total capacity, terminator slot included.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Number of content bytes currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether no further content byte can be stored.
    pub fn is_full(&self) -> bool {
        self.len + 1 >= self.bytes.len()
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.bytes[0] = 0;
    }

    /// Append one byte. Returns `false`, leaving the buffer untouched, when full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        self.bytes[self.len] = 0;
        true
    }

    /// Replace the contents with as much of `src` as fits.
    ///
    /// Returns `true` when `src` had to be truncated.
    pub fn set(&mut self, src: &[u8]) -> bool {
        let keep = src.len().min(self.bytes.len() - 1);
        self.bytes[..keep].copy_from_slice(&src[..keep]);
        self.bytes[keep] = 0;
        self.len = keep;
        keep < src.len()
    }

    /// The content bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The content bytes followed by the NUL terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes[..=self.len]
    }

    /// The content as text.
    ///
    /// Truncation can cut a multi-byte character in half and clients may send
    /// arbitrary bytes, so only the longest valid UTF-8 prefix is returned.
    pub fn as_str(&self) -> &str {
        let bytes = self.as_bytes();
        match str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

/// How a call to [`read_line`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    /// A line terminator was consumed and the whole line fit.
    Complete,
    /// A line terminator was consumed but content past capacity was dropped.
    Truncated,
    /// The source ended before a line terminator was seen.
    Eof,
}

/// Read the next byte, mapping a clean end of stream to `None`.
pub(crate) async fn next_byte<R>(source: &mut R) -> io::Result<Option<u8>>
where
    R: AsyncRead + Unpin,
{
    match source.read_u8().await {
        Ok(byte) => Ok(Some(byte)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

/// Read one `\n` or `\r\n` terminated line into `line`.
///
/// Capture stops at the first `\r` or `\n`, or once the buffer is full. In the
/// first and last case the rest of the line, up to and including the next
/// `\n`, is consumed and discarded.
pub async fn read_line<R>(source: &mut R, line: &mut BoundedBuf) -> io::Result<LineEnd>
where
    R: AsyncRead + Unpin,
{
    line.clear();

    let mut truncated = false;
    loop {
        let Some(byte) = next_byte(source).await? else {
            return Ok(LineEnd::Eof);
        };
        match byte {
            b'\n' => return Ok(LineEnd::Complete),
            b'\r' => break,
            _ => {
                if !line.push(byte) {
                    truncated = true;
                    break;
                }
            }
        }
    }

    loop {
        match next_byte(source).await? {
            Some(b'\n') => break,
            Some(_) => continue,
            None => return Ok(LineEnd::Eof),
        }
    }

    Ok(if truncated {
        LineEnd::Truncated
    } else {
        LineEnd::Complete
    })
}

/// Consume header lines until an empty line or the end of input.
///
/// Header content is never inspected. Returns the number of non-empty lines
/// that were discarded.
pub async fn skip_headers<R>(source: &mut R, line: &mut BoundedBuf) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut skipped = 0;
    loop {
        let end = read_line(source, line).await?;
        if line.is_empty() {
            return Ok(skipped);
        }
        skipped += 1;
        if end == LineEnd::Eof {
            return Ok(skipped);
        }
    }
}
