//! Photo metadata extraction from embedded EXIF and IPTC blocks.
//!
//! Extraction is all-or-nothing per file: an unreadable header, a malformed
//! EXIF block or a truncated IPTC block fails the file with its path
//! attached. Tags that are simply absent yield `None` fields.

mod exif_tags;
pub mod iptc;
pub mod text;

pub use text::{latin1_decode, repair_text};

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

use crate::error::{MetadataCause, MetadataError};
use crate::types::{ImageSize, PhotoMetadata, PositionData};

/// Extracts normalized [`PhotoMetadata`] from a photo's bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Read a file from disk and extract its metadata.
    pub fn extract_file(path: &Path) -> Result<PhotoMetadata, MetadataError> {
        let bytes = std::fs::read(path).map_err(|e| MetadataError::new(path, e))?;
        Self::extract(path, &bytes)
    }

    /// Extract metadata from a file's bytes.
    ///
    /// `path` names the file in errors and is the format fallback when the
    /// content has no recognizable signature.
    pub fn extract(path: &Path, bytes: &[u8]) -> Result<PhotoMetadata, MetadataError> {
        Self::extract_inner(path, bytes).map_err(|cause| MetadataError::new(path, cause))
    }

    fn extract_inner(path: &Path, bytes: &[u8]) -> Result<PhotoMetadata, MetadataCause> {
        let (format, size) = Self::probe(path, bytes)?;

        let exif = if Self::carries_exif(format) {
            exif_tags::read_exif(bytes)?
        } else {
            None
        };
        let iptc = iptc::read_iptc(bytes)
            .map_err(MetadataCause::Iptc)?
            .unwrap_or_default();

        let creation_date = iptc
            .date_time()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0);
        let keywords = iptc
            .keywords
            .iter()
            .map(|k| repair_text(k))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MetadataCause::Iptc(format!("keyword: {e}")))?;

        Ok(PhotoMetadata {
            keywords,
            camera_data: exif.as_ref().map(exif_tags::camera_data).unwrap_or_default(),
            position_data: PositionData {
                gps: exif.as_ref().map(exif_tags::gps_data).unwrap_or_default(),
                country: iptc.country,
                state: iptc.state,
                city: iptc.city,
            },
            size,
            creation_date,
        })
    }

    /// Detect the container format and read pixel dimensions from its header.
    fn probe(path: &Path, bytes: &[u8]) -> Result<(Option<ImageFormat>, ImageSize), MetadataCause> {
        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        if reader.format().is_none() {
            if let Ok(format) = ImageFormat::from_path(path) {
                reader.set_format(format);
            }
        }
        let format = reader.format();
        let (width, height) = reader.into_dimensions()?;
        Ok((format, ImageSize { width, height }))
    }

    /// Containers `kamadak-exif` knows how to search for an EXIF block.
    fn carries_exif(format: Option<ImageFormat>) -> bool {
        matches!(
            format,
            Some(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Tiff | ImageFormat::WebP)
        )
    }
}
