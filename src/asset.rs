//! File and reader entry points
//!
//! The scanner works on a complete in-memory buffer. This module gets the
//! bytes there: from a path, from any reader, or (with the `memory-mapped`
//! feature) by mapping the file.

use crate::{
    error::{Error, Result},
    media_type::MediaType,
    metadata::MetadataMap,
    scanner::{extract_metadata, ChunkScanner},
};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Largest input read into memory (256 MB)
///
/// Text metadata lives in small chunks; anything bigger than this is not a
/// generator PNG worth buffering.
pub const MAX_INPUT_SIZE: u64 = 256 * 1024 * 1024;

enum AssetData {
    Owned(Vec<u8>),
    #[cfg(feature = "memory-mapped")]
    Mapped(memmap2::Mmap),
}

/// A PNG held in memory, ready to scan
///
/// # Example
///
/// ```no_run
/// use png_text_io::{MetadataView, PngAsset};
///
/// # fn main() -> png_text_io::Result<()> {
/// let asset = PngAsset::open("00001-1234567890.png")?;
/// let metadata = asset.metadata();
/// print!("{}", MetadataView::split(&metadata));
/// # Ok(())
/// # }
/// ```
pub struct PngAsset {
    data: AssetData,
    media_type: MediaType,
}

impl PngAsset {
    /// Read a file into memory
    ///
    /// The file is accepted if its extension is `png` or its header carries
    /// the PNG signature; otherwise [`Error::UnsupportedFormat`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        check_size(file.metadata()?.len())?;

        // The file may have grown since the size check
        let data = read_all(file)?;

        let media_type = gate(Some(path), &data)?;
        tracing::debug!(path = %path.display(), size = data.len(), "opened asset");

        Ok(Self {
            data: AssetData::Owned(data),
            media_type,
        })
    }

    /// Memory-map a file instead of reading it
    #[cfg(feature = "memory-mapped")]
    pub fn open_mmap<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        check_size(file.metadata()?.len())?;

        // SAFETY: the map is read-only and owned by this asset; callers must
        // not truncate the file while it is mapped.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        let media_type = gate(Some(path), &mmap)?;
        tracing::debug!(path = %path.display(), size = mmap.len(), "mapped asset");

        Ok(Self {
            data: AssetData::Mapped(mmap),
            media_type,
        })
    }

    /// Read a whole stream into memory
    ///
    /// With no file name to go by, the header must carry the PNG signature.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let data = read_all(reader)?;
        let media_type = gate(None, &data)?;
        Ok(Self {
            data: AssetData::Owned(data),
            media_type,
        })
    }

    /// Raw bytes
    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            AssetData::Owned(data) => data.as_slice(),
            #[cfg(feature = "memory-mapped")]
            AssetData::Mapped(mmap) => &mmap[..],
        }
    }

    /// Detected media type
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Extract text metadata with lenient defaults
    pub fn metadata(&self) -> MetadataMap {
        extract_metadata(self.bytes())
    }

    /// Extract text metadata with a configured scanner
    pub fn metadata_with(&self, scanner: &ChunkScanner) -> Result<MetadataMap> {
        scanner.scan(self.bytes())
    }
}

impl std::fmt::Debug for PngAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PngAsset")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes().len())
            .finish()
    }
}

/// Read a stream to the end and extract its text metadata
///
/// No media-type gate is applied; the bytes go straight to the lenient
/// scanner.
pub fn read_metadata<R: Read>(reader: R) -> Result<MetadataMap> {
    let data = read_all(reader)?;
    Ok(extract_metadata(&data))
}

fn check_size(size: u64) -> Result<()> {
    if size > MAX_INPUT_SIZE {
        return Err(Error::DataTooLarge {
            size,
            max: MAX_INPUT_SIZE,
        });
    }
    Ok(())
}

fn read_all<R: Read>(reader: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    // One byte past the limit tells an oversized stream from an exact fit
    reader.take(MAX_INPUT_SIZE + 1).read_to_end(&mut data)?;
    check_size(data.len() as u64)?;
    Ok(data)
}

fn gate(path: Option<&Path>, data: &[u8]) -> Result<MediaType> {
    path.and_then(MediaType::from_path)
        .or_else(|| MediaType::detect(data))
        .ok_or(Error::UnsupportedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PngBuilder;
    use std::io::Cursor;

    #[test]
    fn test_read_metadata_from_reader() {
        let png = PngBuilder::new().text("Author", "Alice").build();
        let metadata = read_metadata(Cursor::new(png)).unwrap();
        assert_eq!(metadata.get("Author").unwrap().first(), "Alice");
    }

    #[test]
    fn test_read_metadata_accepts_garbage() {
        let metadata = read_metadata(Cursor::new(b"not a png".to_vec())).unwrap();
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_from_reader_gates_on_signature() {
        let result = PngAsset::from_reader(Cursor::new(b"GIF89a....".to_vec()));
        assert!(matches!(result, Err(Error::UnsupportedFormat)));

        let png = PngBuilder::new().text("Seed", "7").build();
        let asset = PngAsset::from_reader(Cursor::new(png)).unwrap();
        assert_eq!(asset.media_type(), MediaType::Png);
        assert_eq!(asset.metadata().get("Seed").unwrap().first(), "7");
    }

    #[test]
    fn test_gate_prefers_extension() {
        assert_eq!(gate(Some(Path::new("x.png")), b"junk").unwrap(), MediaType::Png);
        assert!(gate(Some(Path::new("x.jpg")), b"junk").is_err());
    }

    #[test]
    fn test_open_reads_whole_file() {
        let png = PngBuilder::new().text("Author", "Alice").text("Lora", "X").build();
        let path = std::env::temp_dir().join(format!("png_text_io_open_{}.png", std::process::id()));
        std::fs::write(&path, &png).unwrap();

        let asset = PngAsset::open(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(asset.bytes(), png.as_slice());
        assert_eq!(asset.metadata().len(), 2);
    }

    #[test]
    fn test_size_limit() {
        assert!(check_size(MAX_INPUT_SIZE).is_ok());
        assert!(matches!(
            check_size(MAX_INPUT_SIZE + 1),
            Err(Error::DataTooLarge { .. })
        ));
    }
}
