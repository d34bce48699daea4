//! Recursive directory walking with subdirectory previews.
//!
//! The requested directory is walked in full: every photo is extracted and
//! every subdirectory is walked as a *preview*, which collects at most
//! `preview_photos` of its own photos and never descends further.
//!
//! All children of a directory run concurrently. The directory succeeds only
//! when every child succeeds; the first failure fails the directory and the
//! remaining results are discarded.

use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MetadataCause, MetadataError, ScanError, ScanResult};
use crate::types::{DirectoryNode, PhotoNode};

use super::classify::ImageClassifier;
use super::metadata::MetadataExtractor;
use super::source::{EntryKind, FileSource};

/// Locates a directory both within the library and on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryInfo {
    /// Library-relative path, `/`-separated, empty for the library root
    pub relative: String,
    /// Basename
    pub name: String,
    /// Library-relative parent path with a trailing `/` (`./` at top level)
    pub parent: String,
    /// Location on disk
    pub absolute: PathBuf,
}

impl DirectoryInfo {
    /// Describe `relative` under `image_root`.
    ///
    /// Empty and `.` components are dropped; `..` is kept as given, so
    /// callers must confine requests to the image root themselves.
    pub fn resolve(image_root: &Path, relative: &str) -> Self {
        let relative = relative
            .split(['/', '\\'])
            .filter(|c| !c.is_empty() && *c != ".")
            .collect::<Vec<_>>()
            .join("/");

        let (parent, name) = match relative.rsplit_once('/') {
            Some((parent, name)) => (format!("{parent}/"), name.to_string()),
            None => ("./".to_string(), relative.clone()),
        };
        let absolute = if relative.is_empty() {
            image_root.to_path_buf()
        } else {
            image_root.join(&relative)
        };

        Self {
            relative,
            name,
            parent,
            absolute,
        }
    }

    /// Describe a subdirectory of this directory.
    pub fn child(&self, name: &str) -> Self {
        let (relative, parent) = if self.relative.is_empty() {
            (name.to_string(), "./".to_string())
        } else {
            (
                format!("{}/{}", self.relative, name),
                format!("{}/", self.relative),
            )
        };
        Self {
            relative,
            name: name.to_string(),
            parent,
            absolute: self.absolute.join(name),
        }
    }
}

enum Scanned {
    Directory(DirectoryNode),
    Photo(PhotoNode),
}

/// Walks directories through a [`FileSource`] and builds unlinked trees.
pub struct DirectoryWalker {
    source: Arc<dyn FileSource>,
    preview_photos: usize,
}

impl DirectoryWalker {
    /// Create a walker that previews `preview_photos` photos per subdirectory.
    pub fn new(source: Arc<dyn FileSource>, preview_photos: usize) -> Self {
        Self {
            source,
            preview_photos,
        }
    }

    /// Walk a scan root: all of its photos plus a preview of each subdirectory.
    pub async fn walk_root(&self, info: &DirectoryInfo) -> ScanResult<DirectoryNode> {
        let start = std::time::Instant::now();
        let node = self.walk(info.clone(), None, false).await?;
        tracing::debug!(
            "Scanned {:?} in {:?} ({} photos, {} directories)",
            info.absolute,
            start.elapsed(),
            node.photos.len(),
            node.directories.len()
        );
        Ok(node)
    }

    /// Walk one directory.
    ///
    /// With `photos_only` set, subdirectories are ignored. With `max_photos`
    /// set, photo scheduling stops once that many are scheduled and the rest
    /// of the listing is skipped. Output order follows the listing, whatever
    /// order the children complete in.
    pub fn walk(
        &self,
        info: DirectoryInfo,
        max_photos: Option<usize>,
        photos_only: bool,
    ) -> BoxFuture<'_, ScanResult<DirectoryNode>> {
        async move {
            let mut node = DirectoryNode::new(info.name.clone(), info.parent.clone());

            let entries =
                self.source
                    .list_dir(&info.absolute)
                    .await
                    .map_err(|source| ScanError::Listing {
                        directory: info.absolute.clone(),
                        source,
                    })?;

            let mut children: Vec<BoxFuture<'_, ScanResult<Scanned>>> = Vec::new();
            let mut photos_scheduled = 0usize;

            for entry in entries {
                match entry.kind {
                    EntryKind::Directory if !photos_only => {
                        let child = info.child(&entry.name);
                        children.push(
                            self.walk(child, Some(self.preview_photos), true)
                                .map(|r| r.map(Scanned::Directory))
                                .boxed(),
                        );
                    }
                    // In a preview, an image-named directory is read as a photo.
                    _ if ImageClassifier::is_image(Path::new(&entry.name)) => {
                        if max_photos.is_some_and(|max| photos_scheduled >= max) {
                            break;
                        }
                        photos_scheduled += 1;
                        let path = info.absolute.join(&entry.name);
                        children.push(
                            self.load_photo(entry.name, path)
                                .map(|r| r.map(Scanned::Photo))
                                .boxed(),
                        );
                    }
                    _ => tracing::trace!("Ignoring {:?} in {:?}", entry.name, info.absolute),
                }
            }

            let scanned = try_join_all(children)
                .await
                .map_err(|e| ScanError::in_directory(&info.absolute, e))?;

            for item in scanned {
                match item {
                    Scanned::Directory(dir) => node.directories.push(dir),
                    Scanned::Photo(photo) => node.photos.push(photo),
                }
            }
            Ok(node)
        }
        .boxed()
    }

    /// Read a photo and extract its metadata off the async workers.
    async fn load_photo(&self, name: String, path: PathBuf) -> ScanResult<PhotoNode> {
        let bytes = self
            .source
            .read_file(&path)
            .await
            .map_err(|e| MetadataError::new(&path, e))?;

        let extract_path = path.clone();
        let metadata =
            tokio::task::spawn_blocking(move || MetadataExtractor::extract(&extract_path, &bytes))
                .await
                .map_err(|e| MetadataError::new(&path, MetadataCause::Worker(e.to_string())))??;

        tracing::trace!("Extracted {:?}", path);
        Ok(PhotoNode::new(name, metadata))
    }
}
