//! Error types for the Galleria library scanner.
//!
//! Errors are organized by stage so a failed scan reports where it failed:
//! the directory chain from the scan root down to the failing directory or
//! file, and the underlying cause.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for Galleria operations.
#[derive(Error, Debug)]
pub enum GalleriaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Library scan errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Metadata extraction failed for a single file.
///
/// No partial metadata survives this error: a file either yields a complete
/// [`PhotoMetadata`](crate::types::PhotoMetadata) or fails as a whole.
#[derive(Error, Debug)]
#[error("Metadata extraction failed for {}: {cause}", file.display())]
pub struct MetadataError {
    pub file: PathBuf,
    #[source]
    pub cause: MetadataCause,
}

impl MetadataError {
    pub fn new(file: impl Into<PathBuf>, cause: impl Into<MetadataCause>) -> Self {
        Self {
            file: file.into(),
            cause: cause.into(),
        }
    }
}

/// Underlying reason a file's metadata could not be extracted.
#[derive(Error, Debug)]
pub enum MetadataCause {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable image header: {0}")]
    Image(#[from] image::ImageError),

    #[error("malformed EXIF block: {0}")]
    Exif(#[from] exif::Error),

    #[error("malformed IPTC block: {0}")]
    Iptc(String),

    #[error("extraction task failed: {0}")]
    Worker(String),
}

/// Errors produced while walking a library directory.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A directory could not be enumerated
    #[error("Cannot list directory {}: {source}", directory.display())]
    Listing {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A photo's metadata could not be extracted
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A child of this directory failed, failing the directory as a whole
    #[error("Scan of {} failed: {source}", directory.display())]
    Directory {
        directory: PathBuf,
        #[source]
        source: Box<ScanError>,
    },

    /// The worker pool could not run or answer the request
    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

impl ScanError {
    /// Wrap a child failure with the directory that contained it.
    pub(crate) fn in_directory(directory: impl Into<PathBuf>, source: ScanError) -> Self {
        Self::Directory {
            directory: directory.into(),
            source: Box::new(source),
        }
    }

    /// The file whose extraction caused this failure, if any.
    ///
    /// Follows the directory chain down to the originating error.
    pub fn failed_file(&self) -> Option<&Path> {
        match self {
            Self::Metadata(err) => Some(&err.file),
            Self::Directory { source, .. } => source.failed_file(),
            Self::Listing { .. } | Self::Dispatch(_) => None,
        }
    }

    /// The innermost error of a directory chain.
    pub fn root_cause(&self) -> &ScanError {
        match self {
            Self::Directory { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convenience type alias for Galleria results.
pub type Result<T> = std::result::Result<T, GalleriaError>;

/// Convenience type alias for scan-specific results.
pub type ScanResult<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn broken_file() -> ScanError {
        ScanError::Metadata(MetadataError::new(
            "/lib/sub/bad.jpg",
            MetadataCause::Iptc("dataset overruns block".into()),
        ))
    }

    #[test]
    fn test_failed_file_follows_directory_chain() {
        let err = ScanError::in_directory(
            "/lib",
            ScanError::in_directory("/lib/sub", broken_file()),
        );
        assert_eq!(err.failed_file(), Some(Path::new("/lib/sub/bad.jpg")));
        assert!(matches!(err.root_cause(), ScanError::Metadata(_)));
    }

    #[test]
    fn test_listing_error_has_no_failed_file() {
        let err = ScanError::Listing {
            directory: PathBuf::from("/missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.failed_file().is_none());
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_display_names_every_level() {
        let err = ScanError::in_directory("/lib", broken_file());
        let message = err.to_string();
        assert!(message.contains("/lib"));
        assert!(message.contains("bad.jpg"));
        assert!(message.contains("dataset overruns block"));
    }
}
