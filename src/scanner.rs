//! `tEXt` chunk scanner
//!
//! The scanner is deliberately lenient: it skips the signature without
//! looking at it, never checks CRCs, and treats a chunk that overruns the
//! buffer as the end of the stream. Real-world generator output is often
//! slightly off, and partial metadata is more useful than an error. Stricter
//! behavior is opt-in through [`ScanOptions`].

use crate::{
    chunk::{has_png_signature, Chunk, Chunks, IEND, TEXT},
    error::{Error, Result},
    metadata::MetadataMap,
};

/// How `tEXt` payload bytes are turned into strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8, invalid sequences replaced with U+FFFD
    #[default]
    Utf8Lossy,
    /// UTF-8; a chunk with invalid bytes is dropped
    Utf8Strict,
    /// ISO-8859-1, every byte maps to the same code point
    Latin1,
}

impl TextEncoding {
    /// Decode a byte slice, `None` if this encoding rejects it
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Lossy => Some(String::from_utf8_lossy(bytes).into_owned()),
            Self::Utf8Strict => std::str::from_utf8(bytes).ok().map(str::to_string),
            Self::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Scanner configuration
///
/// The default is the lenient behavior described in the module docs.
///
/// # Example
///
/// ```
/// use png_text_io::{ScanOptions, TextEncoding};
///
/// let options = ScanOptions::new()
///     .check_signature(true)
///     .encoding(TextEncoding::Latin1);
/// assert!(options.checks_signature());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    check_signature: bool,
    verify_crc: bool,
    stop_at_iend: bool,
    encoding: TextEncoding,
}

impl ScanOptions {
    /// Lenient defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject input that does not start with the PNG signature
    pub fn check_signature(mut self, enabled: bool) -> Self {
        self.check_signature = enabled;
        self
    }

    /// Skip text chunks whose stored CRC does not match
    pub fn verify_crc(mut self, enabled: bool) -> Self {
        self.verify_crc = enabled;
        self
    }

    /// End the scan after the `IEND` chunk
    pub fn stop_at_iend(mut self, enabled: bool) -> Self {
        self.stop_at_iend = enabled;
        self
    }

    /// Text decoding for `tEXt` payloads
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Whether signature checking is enabled
    pub fn checks_signature(&self) -> bool {
        self.check_signature
    }

    /// Whether CRC verification is enabled
    pub fn verifies_crc(&self) -> bool {
        self.verify_crc
    }

    /// Whether the scan ends at `IEND`
    pub fn stops_at_iend(&self) -> bool {
        self.stop_at_iend
    }

    /// Configured text decoding
    pub fn text_encoding(&self) -> TextEncoding {
        self.encoding
    }
}

/// Split a `tEXt` payload on its first NUL
///
/// Later NULs belong to the text. A payload without any NUL is all keyword.
pub fn split_text_payload(data: &[u8]) -> (&[u8], &[u8]) {
    match data.iter().position(|&b| b == 0) {
        Some(nul) => (&data[..nul], &data[nul + 1..]),
        None => (data, &[]),
    }
}

/// Single-pass `tEXt` metadata scanner
#[derive(Debug, Clone, Default)]
pub struct ChunkScanner {
    options: ScanOptions,
}

impl ChunkScanner {
    /// Scanner with lenient defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner with explicit options
    pub fn with_options(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a buffer, honoring every option
    ///
    /// Only the signature check can fail; with default options this always
    /// returns `Ok`.
    pub fn scan(&self, buffer: &[u8]) -> Result<MetadataMap> {
        if self.options.check_signature && !has_png_signature(buffer) {
            return Err(Error::InvalidFormat("Not a PNG file".into()));
        }
        Ok(self.collect(buffer))
    }

    /// Scan a buffer without the signature gate
    ///
    /// Never fails: malformed structure ends the scan early and whatever was
    /// collected up to that point is returned.
    pub fn collect(&self, buffer: &[u8]) -> MetadataMap {
        let mut metadata = MetadataMap::new();
        let mut chunks = Chunks::new(buffer);

        for chunk in chunks.by_ref() {
            tracing::trace!(chunk = %chunk, "png chunk");

            if chunk.is(TEXT) {
                self.merge_text_chunk(&chunk, &mut metadata);
            } else if self.options.stop_at_iend && chunk.is(IEND) {
                break;
            }
        }

        if let Some(offset) = chunks.truncated_at() {
            tracing::warn!(
                offset,
                buffer_len = buffer.len(),
                "chunk length overruns buffer, stopping scan"
            );
        }

        metadata
    }

    fn merge_text_chunk(&self, chunk: &Chunk<'_>, metadata: &mut MetadataMap) {
        if self.options.verify_crc && !chunk.crc_matches() {
            tracing::debug!(offset = chunk.offset, "tEXt CRC mismatch, chunk skipped");
            return;
        }

        let (keyword, text) = split_text_payload(chunk.data);
        let encoding = self.options.encoding;
        match (encoding.decode(keyword), encoding.decode(text)) {
            (Some(keyword), Some(text)) => metadata.insert(keyword, text),
            _ => {
                tracing::debug!(
                    offset = chunk.offset,
                    ?encoding,
                    "tEXt payload not decodable, chunk skipped"
                );
            }
        }
    }
}

/// Extract all `tEXt` metadata from a PNG buffer with lenient defaults
///
/// # Example
///
/// ```
/// use png_text_io::extract_metadata;
///
/// // Signature only: no chunks, no metadata
/// let metadata = extract_metadata(b"\x89PNG\r\n\x1a\n");
/// assert!(metadata.is_empty());
/// ```
pub fn extract_metadata(buffer: &[u8]) -> MetadataMap {
    ChunkScanner::new().collect(buffer)
}
