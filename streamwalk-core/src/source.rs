//! Chunk sources and the byte-to-text decode step.
//!
//! A [`ChunkSource`] is pulled one chunk at a time. The walker never issues a
//! second `read` while one is outstanding, and stops reading for good once a
//! source reports end-of-stream.
//!
//! ```text
//! ChunkSource        Utf8Decoder          IncrementalParser
//!     │                   │                      │
//!     │──read()─────────▶│                      │
//!     │  Some(bytes)      │──decode(bytes)──────▶│ write(text)
//!     │                   │  (split code points  │
//!     │                   │   held back)         │
//!     │  None             │──finish()───────────▶│ finish()
//! ```

use std::convert::Infallible;
use std::io::{self, Read};

/// Pull-based provider of byte chunks.
pub trait ChunkSource {
    /// Failure reported by the transport.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the next chunk. `Ok(None)` signals end-of-stream.
    ///
    /// Once `Ok(None)` has been returned the walker never calls `read` again.
    fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    type Error = S::Error;

    fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).read()
    }
}

impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    type Error = S::Error;

    fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).read()
    }
}

/// Infallible source over any iterator of byte-like chunks.
///
/// ```
/// use streamwalk_core::source::{ChunkSource, IterSource};
///
/// let mut source = IterSource::new(["<p>", "hi</p>"]);
/// assert_eq!(source.read().unwrap(), Some(b"<p>".to_vec()));
/// ```
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    chunks: I,
}

impl<I> IterSource<I>
where
    I: Iterator,
    I::Item: Into<Vec<u8>>,
{
    pub fn new<C: IntoIterator<IntoIter = I>>(chunks: C) -> Self {
        IterSource { chunks: chunks.into_iter() }
    }
}

impl<I> ChunkSource for IterSource<I>
where
    I: Iterator,
    I::Item: Into<Vec<u8>>,
{
    type Error = Infallible;

    fn read(&mut self) -> Result<Option<Vec<u8>>, Infallible> {
        Ok(self.chunks.next().map(Into::into))
    }
}

/// Source over an iterator of `Result` chunks; errors pass through untouched.
#[derive(Debug, Clone)]
pub struct TryIterSource<I> {
    chunks: I,
}

impl<I, B, E> TryIterSource<I>
where
    I: Iterator<Item = Result<B, E>>,
    B: Into<Vec<u8>>,
    E: std::error::Error + Send + Sync + 'static,
{
    pub fn new<C: IntoIterator<IntoIter = I>>(chunks: C) -> Self {
        TryIterSource { chunks: chunks.into_iter() }
    }
}

impl<I, B, E> ChunkSource for TryIterSource<I>
where
    I: Iterator<Item = Result<B, E>>,
    B: Into<Vec<u8>>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn read(&mut self) -> Result<Option<Vec<u8>>, E> {
        self.chunks.next().transpose().map(|chunk| chunk.map(Into::into))
    }
}

/// Source reading fixed-capacity chunks from any `std::io::Read`.
///
/// A zero-length read is end-of-stream. `ErrorKind::Interrupted` is retried
/// here; every other I/O error is handed to the walker as-is.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    capacity: usize,
}

impl<R: Read> ReaderSource<R> {
    /// Default read size in bytes.
    pub const DEFAULT_CAPACITY: usize = 8 * 1024;

    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        ReaderSource { reader, capacity: capacity.max(1) }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ChunkSource for ReaderSource<R> {
    type Error = io::Error;

    fn read(&mut self) -> Result<Option<Vec<u8>>, io::Error> {
        let mut buf = vec![0; self.capacity];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    buf.truncate(n);
                    return Ok(Some(buf));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Streaming UTF-8 decoder.
///
/// Code points split across chunks are held back until the rest arrives.
/// Invalid sequences decode to U+FFFD, the way a lossy decode would.
/// A leading byte order mark is dropped.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Incomplete trailing sequence of the previous chunk (at most 3 bytes)
    pending: Vec<u8>,
    /// Total bytes received so far
    total_bytes: u64,
    /// Whether the stream start (and its possible BOM) is behind us
    started: bool,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes handed to [`decode`](Self::decode) so far.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Decode one chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.total_bytes += chunk.len() as u64;
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        if !self.started {
            if bytes.len() < UTF8_BOM.len() && UTF8_BOM.starts_with(&bytes) {
                self.pending = bytes;
                return String::new();
            }
            self.started = true;
            if bytes.starts_with(UTF8_BOM) {
                bytes.drain(..UTF8_BOM.len());
            }
        }

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            // Truncated sequence at the end: wait for more bytes.
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end-of-stream. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let pending = std::mem::take(&mut self.pending);
        if !self.started && UTF8_BOM.starts_with(&pending) {
            self.started = true;
            return None;
        }
        self.started = true;
        Some(String::from_utf8_lossy(&pending).into_owned())
    }
}

// ============================================================================
// Tests
// ============================================================================
