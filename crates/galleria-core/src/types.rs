//! Core data types for a scanned photo library.
//!
//! A scan produces a tree of [`DirectoryNode`]s that own their child
//! directories and [`PhotoNode`]s. Photos refer back to their directory
//! through a [`DirectoryId`], assigned by the linking pass once the tree is
//! complete, so ownership stays strictly tree-shaped.

use serde::{Deserialize, Serialize};

/// Identity of a directory within one linked scan tree.
///
/// Ids are assigned in pre-order starting at 0 for the scan root and are
/// only meaningful within the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryId(pub usize);

/// A scanned folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryNode {
    /// Set by the linking pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<DirectoryId>,

    /// Basename of the directory
    pub name: String,

    /// Library-relative path of the parent, with a trailing `/`
    pub path: String,

    /// Scan time in epoch milliseconds
    pub last_update: i64,

    /// Child directories, in listing order
    pub directories: Vec<DirectoryNode>,

    /// Photos, in listing order
    pub photos: Vec<PhotoNode>,
}

impl DirectoryNode {
    /// Create an empty directory node stamped with the current time.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            path: path.into(),
            last_update: chrono::Utc::now().timestamp_millis(),
            directories: Vec::new(),
            photos: Vec::new(),
        }
    }

    /// The id assigned by the linking pass, if the tree has been linked.
    pub fn id(&self) -> Option<DirectoryId> {
        self.id
    }

    /// Library-relative path of this directory itself (`path` + `name`).
    pub fn relative_path(&self) -> String {
        let parent = self.path.strip_prefix("./").unwrap_or(&self.path);
        format!("{}{}", parent, self.name)
    }
}

/// A classified image file within a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoNode {
    /// Filename
    pub name: String,

    /// Back-reference to the owning directory, written once by the linking pass
    #[serde(default)]
    pub(crate) directory: Option<DirectoryId>,

    pub metadata: PhotoMetadata,
}

impl PhotoNode {
    /// Create an unlinked photo node.
    pub fn new(name: impl Into<String>, metadata: PhotoMetadata) -> Self {
        Self {
            name: name.into(),
            directory: None,
            metadata,
        }
    }

    /// The directory that owns this photo, once the tree has been linked.
    pub fn directory(&self) -> Option<DirectoryId> {
        self.directory
    }
}

/// Normalized metadata extracted from a photo's embedded EXIF and IPTC blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    /// IPTC keywords, text-repaired
    pub keywords: Vec<String>,

    pub camera_data: CameraData,

    pub position_data: PositionData,

    pub size: ImageSize,

    /// Capture time in epoch milliseconds, 0 when absent
    pub creation_date: i64,
}

/// Camera settings from the EXIF block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraData {
    #[serde(rename = "ISO", skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<String>,

    /// Aperture as an f-number (e.g. 2.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_stop: Option<f64>,

    /// Exposure time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<f64>,

    /// Focal length in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
}

/// GPS fix from the EXIF block, decimal degrees and meters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

/// Location: GPS from EXIF, place names from IPTC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    #[serde(rename = "GPS")]
    pub gps: GpsData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}
