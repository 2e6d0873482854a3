//! Test utilities for working with fixture files and synthetic PNGs.
//!
//! This module provides helpers for:
//! - Embedded fixtures (when `embed-fixtures` feature is enabled)
//! - File-based fixtures from `tests/fixtures/`
//! - Extended fixtures from custom directories (via `PNG_TEXT_TEST_FIXTURES` env var)
//! - Building PNG byte streams chunk by chunk with [`PngBuilder`]
//!
//! # Usage
//!
//! ```no_run
//! use png_text_io::test_utils::*;
//!
//! # fn example() -> png_text_io::Result<()> {
//! let bytes = fixture_bytes(A1111_PARAMS)?;
//!
//! let synthetic = PngBuilder::new()
//!     .text("Author", "Alice")
//!     .build();
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, fs, path::PathBuf, sync::LazyLock};

use crate::{
    chunk::{calculate_crc, IEND, PNG_SIGNATURE, TEXT},
    Error, Result,
};

/// Macro to define fixtures with embedded data and file fallback
macro_rules! define_fixtures {
    ($($name:ident => ($file:expr, $format:expr)),* $(,)?) => {
        $(
            #[allow(dead_code)]
            pub const $name: &str = $file;
        )*

        static EMBEDDED_FIXTURES: LazyLock<HashMap<&'static str, (&'static [u8], &'static str)>> =
            LazyLock::new(|| {
                #[allow(unused_mut)]
                let mut map = HashMap::new();
                $(
                    #[cfg(feature = "embed-fixtures")]
                    {
                        let bytes: &'static [u8] = include_bytes!(concat!("../tests/fixtures/", $file));
                        map.insert($file, (bytes, $format));
                    }
                )*
                map
            });

        /// Get the embedded fixtures registry
        pub fn get_registry() -> &'static HashMap<&'static str, (&'static [u8], &'static str)> {
            &EMBEDDED_FIXTURES
        }

        /// List all defined fixtures
        pub fn list_all_fixtures() -> Vec<&'static str> {
            vec![$($file),*]
        }
    };
}

define_fixtures!(
    A1111_PARAMS => ("a1111_params.png", "image/png"),          // parameters + repeated Lora
    COMFYUI_WORKFLOW => ("comfyui_workflow.png", "image/png"),  // prompt/workflow JSON
);

/// Get path to a fixture file
///
/// Search order:
/// 1. PNG_TEXT_TEST_FIXTURES env var (for extended test sets)
/// 2. Default tests/fixtures directory
pub fn fixture_path(file_name: &str) -> PathBuf {
    if let Ok(custom_dir) = std::env::var("PNG_TEXT_TEST_FIXTURES") {
        let path = PathBuf::from(custom_dir).join(file_name);
        if path.exists() {
            return path;
        }
    }

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(file_name);
    path
}

/// Helper to get fixture data as bytes
pub fn fixture_bytes(name: &str) -> Result<Vec<u8>> {
    if let Some(fixture) = get_registry().get(name) {
        return Ok(fixture.0.to_vec());
    }

    fs::read(fixture_path(name)).map_err(Error::Io)
}

/// List all available fixtures (defined + `PNG_TEXT_TEST_FIXTURES` directory)
pub fn list_fixtures() -> Result<Vec<String>> {
    let mut fixtures: Vec<String> = list_all_fixtures().into_iter().map(String::from).collect();

    if let Ok(custom_dir) = std::env::var("PNG_TEXT_TEST_FIXTURES") {
        let extended_path = PathBuf::from(custom_dir);
        if extended_path.is_dir() {
            for entry in fs::read_dir(extended_path).map_err(Error::Io)? {
                let path = entry.map_err(Error::Io)?.path();
                let is_png = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
                if !path.is_file() || !is_png {
                    continue;
                }
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if !fixtures.iter().any(|f| f == name) {
                        fixtures.push(name.to_string());
                    }
                }
            }
        }
    }

    Ok(fixtures)
}

/// Check if a fixture is embedded
pub fn is_embedded(fixture_name: &str) -> bool {
    get_registry().contains_key(fixture_name)
}

// 1x1 8-bit grayscale
const IHDR_DATA: [u8; 13] = [0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0];
// zlib stream for one filter byte and one pixel
const IDAT_DATA: [u8; 10] = [0x78, 0x9c, 0x63, 0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01];

/// Builds PNG byte streams chunk by chunk
///
/// `new()` writes the signature and an `IHDR`; `build()` appends `IDAT` and
/// `IEND` unless an `IEND` or a truncated chunk was already written.
#[derive(Debug, Clone)]
pub struct PngBuilder {
    bytes: Vec<u8>,
    corrupt_next_crc: bool,
    finished: bool,
}

impl Default for PngBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PngBuilder {
    /// Signature plus a minimal `IHDR`
    pub fn new() -> Self {
        Self::bare().chunk(b"IHDR", &IHDR_DATA)
    }

    /// Signature only
    pub fn bare() -> Self {
        Self {
            bytes: PNG_SIGNATURE.to_vec(),
            corrupt_next_crc: false,
            finished: false,
        }
    }

    /// Append an arbitrary chunk with a correct CRC
    pub fn chunk(mut self, chunk_type: &[u8; 4], data: &[u8]) -> Self {
        let mut crc = calculate_crc(chunk_type, data);
        if std::mem::take(&mut self.corrupt_next_crc) {
            crc ^= 0xFFFF_FFFF;
        }
        self.bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        self.bytes.extend_from_slice(chunk_type);
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(&crc.to_be_bytes());
        self
    }

    /// Append a `tEXt` chunk `keyword\0text`
    pub fn text(self, keyword: &str, text: &str) -> Self {
        self.raw_text(keyword.as_bytes(), text.as_bytes())
    }

    /// Append a `tEXt` chunk from raw keyword and text bytes
    pub fn raw_text(self, keyword: &[u8], text: &[u8]) -> Self {
        let mut payload = Vec::with_capacity(keyword.len() + 1 + text.len());
        payload.extend_from_slice(keyword);
        payload.push(0);
        payload.extend_from_slice(text);
        self.chunk(TEXT, &payload)
    }

    /// Append a `tEXt` chunk with the payload taken as-is
    pub fn raw_text_payload(self, payload: &[u8]) -> Self {
        self.chunk(TEXT, payload)
    }

    /// Give the next chunk a wrong CRC
    pub fn corrupt_crc(mut self) -> Self {
        self.corrupt_next_crc = true;
        self
    }

    /// Append `IDAT` and `IEND` now
    pub fn iend(mut self) -> Self {
        self = self.chunk(b"IDAT", &IDAT_DATA).chunk(IEND, &[]);
        self.finished = true;
        self
    }

    /// Append a chunk header declaring `declared_len` bytes but only `data`
    /// after it, ending the stream
    pub fn truncated_chunk(mut self, chunk_type: &[u8; 4], declared_len: u32, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(&declared_len.to_be_bytes());
        self.bytes.extend_from_slice(chunk_type);
        self.bytes.extend_from_slice(data);
        self.finished = true;
        self
    }

    /// Finish the stream
    pub fn build(self) -> Vec<u8> {
        if self.finished {
            self.bytes
        } else {
            self.iend().bytes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunks;

    #[test]
    fn test_fixture_constants() {
        assert_eq!(A1111_PARAMS, "a1111_params.png");
        assert_eq!(COMFYUI_WORKFLOW, "comfyui_workflow.png");
    }

    #[test]
    fn test_fixture_path() {
        let path = fixture_path(A1111_PARAMS);
        assert!(path.to_string_lossy().ends_with("a1111_params.png"));
    }

    #[test]
    fn test_list_all_fixtures() {
        let fixtures = list_all_fixtures();
        assert!(fixtures.contains(&"a1111_params.png"));
        assert_eq!(fixtures.len(), 2);
    }

    #[cfg(not(feature = "embed-fixtures"))]
    #[test]
    fn test_no_embedded_fixtures() {
        assert!(get_registry().is_empty());
        assert!(!is_embedded(A1111_PARAMS));
    }

    #[test]
    fn test_builder_layout() {
        let png = PngBuilder::new().text("k", "v").build();
        let labels: Vec<_> = Chunks::new(&png).map(|c| c.label()).collect();
        assert_eq!(labels, vec!["IHDR", "tEXt", "IDAT", "IEND"]);
        assert!(Chunks::new(&png).all(|c| c.crc_matches()));
    }

    #[test]
    fn test_builder_corrupts_only_next_chunk() {
        let png = PngBuilder::new().corrupt_crc().text("a", "1").text("b", "2").build();
        let crc_ok: Vec<_> = Chunks::new(&png).map(|c| c.crc_matches()).collect();
        assert_eq!(crc_ok, vec![true, false, true, true, true]);
    }
}
