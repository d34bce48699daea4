//! Galleria Core - concurrent photo library scanning.
//!
//! Galleria walks a directory of a photo library and produces a tree of
//! directories and photos, each photo carrying normalized metadata from its
//! embedded EXIF and IPTC blocks. Subdirectories are previewed rather than
//! walked in full, so a browser can show a folder and a glimpse of each child.
//!
//! # Architecture
//!
//! ```text
//! request → ScanPool worker → DirectoryWalker (list, classify, extract) → link → JSON
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use galleria_core::{Config, LocalFs, ScanPool};
//!
//! #[tokio::main]
//! async fn main() -> galleria_core::Result<()> {
//!     let config = Config::load()?;
//!     let pool = ScanPool::start(&config, Arc::new(LocalFs));
//!
//!     let tree = pool.scan("2020/summer").await?;
//!     println!("{} photos", tree.photo_count());
//!     pool.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{ConfigError, GalleriaError, MetadataError, Result, ScanError, ScanResult};
pub use output::{OutputFormat, OutputWriter, PhotoRecord};
pub use scan::{
    DirectoryInfo, DirectoryWalker, FileSource, LocalFs, MetadataExtractor, ScanPool, ScanTicket,
    ScanTree,
};
pub use types::{
    CameraData, DirectoryId, DirectoryNode, GpsData, ImageSize, PhotoMetadata, PhotoNode,
    PositionData,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
