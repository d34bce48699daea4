//! Library scanning.
//!
//! - **classify**: decide which directory entries are photos
//! - **metadata**: extract EXIF/IPTC metadata from a photo
//! - **source**: filesystem access behind a trait
//! - **walker**: build a directory tree with subdirectory previews
//! - **link**: assign directory ids and photo back-references
//! - **dispatcher**: run scans on a worker pool

pub mod classify;
pub mod dispatcher;
pub mod link;
pub mod metadata;
pub mod source;
pub mod walker;

pub use classify::ImageClassifier;
pub use dispatcher::{ScanPool, ScanTicket};
pub use link::{link, photo_path, ScanTree};
pub use metadata::MetadataExtractor;
pub use source::{EntryKind, FileSource, LocalFs, SourceEntry};
pub use walker::{DirectoryInfo, DirectoryWalker};
