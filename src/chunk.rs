//! PNG chunk stream walking
//!
//! A PNG file is an 8-byte signature followed by chunks laid out as
//! `[length:4 BE][type:4][data:length][crc:4]`. [`Chunks`] walks that layout
//! over an in-memory buffer and never reads past its end: a chunk whose
//! declared length overruns the buffer ends the iteration.

use byteorder::{BigEndian, ByteOrder};
use std::fmt;

/// PNG signature
pub const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Size of the length + type header in front of every chunk
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Size of the trailing CRC
pub const CHUNK_CRC_SIZE: usize = 4;

/// Uncompressed text chunk type
pub const TEXT: &[u8; 4] = b"tEXt";

/// Image trailer chunk type
pub const IEND: &[u8; 4] = b"IEND";

/// Get human-readable label for a PNG chunk type
pub fn chunk_label(chunk_type: &[u8; 4]) -> &'static str {
    match chunk_type {
        b"IHDR" => "IHDR",
        b"PLTE" => "PLTE",
        b"IDAT" => "IDAT",
        b"IEND" => "IEND",
        b"tRNS" => "tRNS",
        b"gAMA" => "gAMA",
        b"cHRM" => "cHRM",
        b"sRGB" => "sRGB",
        b"iCCP" => "iCCP",
        b"iTXt" => "iTXt",
        b"tEXt" => "tEXt",
        b"zTXt" => "zTXt",
        b"bKGD" => "bKGD",
        b"pHYs" => "pHYs",
        b"tIME" => "tIME",
        b"eXIf" => "eXIf",
        b"caBX" => "caBX",
        _ => "OTHER",
    }
}

/// Check whether a buffer starts with the PNG signature
pub fn has_png_signature(buffer: &[u8]) -> bool {
    buffer.len() >= PNG_SIGNATURE.len() && &buffer[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

/// Calculate CRC32 for PNG chunk (type + data)
pub fn calculate_crc(chunk_type: &[u8], data: &[u8]) -> u32 {
    let mut crc = 0xFFFFFFFF_u32;

    for &byte in chunk_type.iter().chain(data) {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB88320;
            } else {
                crc >>= 1;
            }
        }
    }

    crc ^ 0xFFFFFFFF
}

/// A single chunk, borrowed from the buffer being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Offset of the chunk's length field from the start of the buffer
    pub offset: usize,
    /// Four type bytes, not necessarily ASCII
    pub chunk_type: [u8; 4],
    /// Payload (`length` bytes)
    pub data: &'a [u8],
    /// Stored CRC, as read from the file
    pub crc: u32,
}

impl<'a> Chunk<'a> {
    /// Declared payload length
    pub fn length(&self) -> usize {
        self.data.len()
    }

    /// Total bytes occupied by this chunk, header and CRC included
    pub fn total_size(&self) -> usize {
        CHUNK_HEADER_SIZE + self.data.len() + CHUNK_CRC_SIZE
    }

    /// Offset of the first byte after this chunk
    pub fn end_offset(&self) -> usize {
        self.offset + self.total_size()
    }

    /// Check the chunk type
    pub fn is(&self, chunk_type: &[u8; 4]) -> bool {
        &self.chunk_type == chunk_type
    }

    /// Type as a 4-character string
    ///
    /// Each byte maps to the code point of the same value, so non-ASCII
    /// types still yield exactly four characters.
    pub fn type_str(&self) -> String {
        self.chunk_type.iter().map(|&b| b as char).collect()
    }

    /// Human-readable label for known chunk types
    pub fn label(&self) -> &'static str {
        chunk_label(&self.chunk_type)
    }

    /// Whether the stored CRC matches the type and payload
    pub fn crc_matches(&self) -> bool {
        calculate_crc(&self.chunk_type, self.data) == self.crc
    }
}

impl fmt::Display for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({} bytes)",
            self.type_str(),
            self.offset,
            self.data.len()
        )
    }
}

/// Iterator over the chunks of a PNG buffer
///
/// The signature is skipped without being checked. Iteration ends when
/// fewer than 8 bytes remain for a chunk header, or when a header declares
/// more data than the buffer holds. In the latter case [`Chunks::truncated_at`]
/// reports the offset of the offending header.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    buffer: &'a [u8],
    offset: usize,
    truncated_at: Option<usize>,
}

impl<'a> Chunks<'a> {
    /// Walk the chunks following the 8-byte signature
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: PNG_SIGNATURE.len(),
            truncated_at: None,
        }
    }

    /// Current cursor position
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset of a chunk header whose declared length overran the buffer
    pub fn truncated_at(&self) -> Option<usize> {
        self.truncated_at
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset;
        let len = self.buffer.len();

        // Room for length + type
        if start.checked_add(CHUNK_HEADER_SIZE)? > len {
            return None;
        }

        let length = BigEndian::read_u32(&self.buffer[start..start + 4]) as usize;
        let mut chunk_type = [0u8; 4];
        chunk_type.copy_from_slice(&self.buffer[start + 4..start + 8]);

        let data_start = start + CHUNK_HEADER_SIZE;
        let end = match data_start
            .checked_add(length)
            .and_then(|n| n.checked_add(CHUNK_CRC_SIZE))
        {
            Some(end) if end <= len => end,
            _ => {
                self.truncated_at = Some(start);
                // Park the cursor at the end so the iterator stays fused
                self.offset = len;
                return None;
            }
        };

        let data_end = data_start + length;
        let crc = BigEndian::read_u32(&self.buffer[data_end..end]);
        self.offset = end;

        Some(Chunk {
            offset: start,
            chunk_type,
            data: &self.buffer[data_start..data_end],
            crc,
        })
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        out.extend_from_slice(&calculate_crc(chunk_type, data).to_be_bytes());
        out
    }

    #[test]
    fn test_crc_of_iend() {
        // Every valid PNG ends with AE 42 60 82
        assert_eq!(calculate_crc(b"IEND", &[]), 0xAE426082);
    }

    #[test]
    fn test_walks_chunks_in_order() {
        let mut buf = PNG_SIGNATURE.to_vec();
        buf.extend(raw_chunk(b"IHDR", &[0; 13]));
        buf.extend(raw_chunk(b"tEXt", b"a\0b"));
        buf.extend(raw_chunk(b"IEND", &[]));

        let chunks: Vec<_> = Chunks::new(&buf).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].offset, 8);
        assert_eq!(chunks[0].label(), "IHDR");
        assert_eq!(chunks[1].offset, 8 + 8 + 13 + 4);
        assert_eq!(chunks[1].data, b"a\0b");
        assert!(chunks[1].is(TEXT));
        assert!(chunks[2].is(IEND));
        assert_eq!(chunks[2].end_offset(), buf.len());
        assert!(chunks.iter().all(|c| c.crc_matches()));
    }

    #[test]
    fn test_stops_on_overrunning_length() {
        let mut buf = PNG_SIGNATURE.to_vec();
        buf.extend(raw_chunk(b"tEXt", b"k\0v"));
        let cut = buf.len();
        buf.extend_from_slice(&1000u32.to_be_bytes());
        buf.extend_from_slice(b"tEXt");
        buf.extend_from_slice(b"short");

        let mut chunks = Chunks::new(&buf);
        assert!(chunks.next().is_some());
        assert!(chunks.next().is_none());
        assert_eq!(chunks.truncated_at(), Some(cut));
        assert!(chunks.next().is_none());
    }

    #[test]
    fn test_max_length_does_not_overflow() {
        let mut buf = PNG_SIGNATURE.to_vec();
        buf.extend_from_slice(&u32::MAX.to_be_bytes());
        buf.extend_from_slice(b"tEXt");
        buf.extend_from_slice(&[0; 16]);

        let mut chunks = Chunks::new(&buf);
        assert!(chunks.next().is_none());
        assert_eq!(chunks.truncated_at(), Some(8));
    }

    #[test]
    fn test_partial_header_is_not_truncation() {
        let mut buf = PNG_SIGNATURE.to_vec();
        buf.extend_from_slice(&[0, 0, 0]);

        let mut chunks = Chunks::new(&buf);
        assert!(chunks.next().is_none());
        assert_eq!(chunks.truncated_at(), None);
    }

    #[test]
    fn test_non_ascii_type_string() {
        let mut buf = PNG_SIGNATURE.to_vec();
        buf.extend(raw_chunk(&[0xFF, b'E', b'X', 0x80], b"x"));

        let chunk = Chunks::new(&buf).next().unwrap();
        assert_eq!(chunk.type_str().chars().count(), 4);
        assert_eq!(chunk.label(), "OTHER");
        assert!(!chunk.is(TEXT));
    }

    #[test]
    fn test_signature_detection() {
        assert!(has_png_signature(PNG_SIGNATURE));
        assert!(!has_png_signature(b"\x89PNG"));
        assert!(!has_png_signature(b"GIF89a\0\0\0\0"));
    }
}
