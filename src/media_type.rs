//! Media type definitions
//!
//! Only PNG carries `tEXt` chunks, so this is a gate rather than a registry:
//! callers use it to decide whether a file is worth scanning at all.

use crate::chunk::has_png_signature;
use std::path::Path;

/// Media types this crate reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// PNG image
    Png,
}

impl MediaType {
    /// Get all supported media types
    pub fn all() -> &'static [MediaType] {
        &[MediaType::Png]
    }

    /// Detect the media type from the first bytes of a file
    ///
    /// # Example
    ///
    /// ```
    /// use png_text_io::MediaType;
    ///
    /// assert_eq!(MediaType::detect(b"\x89PNG\r\n\x1a\n"), Some(MediaType::Png));
    /// assert_eq!(MediaType::detect(b"\xFF\xD8\xFF"), None);
    /// ```
    pub fn detect(header: &[u8]) -> Option<MediaType> {
        has_png_signature(header).then_some(MediaType::Png)
    }

    /// Match a file extension (without dot, case-insensitive)
    pub fn from_extension(ext: &str) -> Option<MediaType> {
        Self::all()
            .iter()
            .copied()
            .find(|media| media.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Match a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<MediaType> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Match a MIME type, ignoring parameters and case
    ///
    /// # Example
    ///
    /// ```
    /// use png_text_io::MediaType;
    ///
    /// assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Png));
    /// assert_eq!(MediaType::from_mime("image/jpeg"), None);
    /// ```
    pub fn from_mime(mime: &str) -> Option<MediaType> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::all()
            .iter()
            .copied()
            .find(|media| media.to_mime().eq_ignore_ascii_case(essence))
    }

    /// Get the primary MIME type for this media type
    pub fn to_mime(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
        }
    }

    /// Get the primary file extension for this media type (without dot)
    pub fn to_extension(&self) -> &'static str {
        self.extensions()[0]
    }

    /// All accepted file extensions
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaType::Png => &["png"],
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_mime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(MediaType::from_extension("PNG"), Some(MediaType::Png));
        assert_eq!(MediaType::from_extension("jpg"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(MediaType::from_path("out/00001-42.png"), Some(MediaType::Png));
        assert_eq!(MediaType::from_path("notes.txt"), None);
        assert_eq!(MediaType::from_path("noext"), None);
    }

    #[test]
    fn test_mime_with_parameters() {
        assert_eq!(MediaType::from_mime("Image/PNG; charset=binary"), Some(MediaType::Png));
    }

    #[test]
    fn test_display() {
        assert_eq!(MediaType::Png.to_string(), "image/png");
        assert_eq!(MediaType::Png.to_extension(), "png");
    }
}
