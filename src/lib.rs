//! Lenient, single-pass extraction of PNG `tEXt` metadata.
//!
//! AI image generators (Automatic1111, ComfyUI, NovelAI and friends) store
//! their generation settings as uncompressed text chunks in the PNG they
//! write. This crate walks the chunk stream of an in-memory buffer and
//! collects every `keyword\0text` pair, keeping repeated keywords and their
//! order.
//!
//! # Design Principles
//!
//! - **Best effort**: malformed or truncated files yield partial metadata,
//!   never a panic and never an out-of-bounds read
//! - **Single pass**: O(n) over the buffer, no allocation per chunk beyond
//!   the extracted strings
//! - **Pure core**: the scanner takes a byte slice and returns a fresh map;
//!   file access lives in a thin layer around it
//!
//! # Quick Start
//!
//! ```
//! use png_text_io::{extract_metadata, test_utils::PngBuilder, MetadataValue};
//!
//! let png = PngBuilder::new()
//!     .text("Author", "Alice")
//!     .text("Lora", "X")
//!     .text("Lora", "Y")
//!     .build();
//!
//! let metadata = extract_metadata(&png);
//! assert_eq!(metadata.get("Author"), Some(&MetadataValue::from("Alice")));
//! assert_eq!(metadata.get("Lora"), Some(&MetadataValue::from(vec!["X", "Y"])));
//! ```
//!
//! # Stricter Scanning
//!
//! Signature and CRC checks are off by default. Turn them on with
//! [`ScanOptions`]:
//!
//! ```
//! use png_text_io::{ChunkScanner, ScanOptions};
//!
//! let scanner = ChunkScanner::with_options(
//!     ScanOptions::new().check_signature(true).verify_crc(true),
//! );
//! assert!(scanner.scan(b"GIF89a").is_err());
//! ```
//!
//! # Display
//!
//! [`MetadataView`] splits the map into the well-known generation
//! parameters and everything else.

mod asset;
pub mod chunk;
mod error;
mod media_type;
mod metadata;
mod presentation;
mod scanner;

pub use asset::{read_metadata, PngAsset, MAX_INPUT_SIZE};
pub use chunk::{Chunk, Chunks, PNG_SIGNATURE};
pub use error::{Error, Result};
pub use media_type::MediaType;
pub use metadata::{MetadataEntry, MetadataMap, MetadataValue};
pub use presentation::{format_value, is_highlighted, MetadataView, HIGHLIGHTED_KEYS};
pub use scanner::{extract_metadata, split_text_payload, ChunkScanner, ScanOptions, TextEncoding};

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
