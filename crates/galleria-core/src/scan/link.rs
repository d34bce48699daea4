//! Linking pass: directory ids and photo back-references.
//!
//! Runs once over a completed tree. Every directory gets a pre-order
//! [`DirectoryId`] (the scan root is 0) and every photo records the id of the
//! directory that owns it. [`ScanTree`] resolves ids back to directories.

use std::path::{Path, PathBuf};

use crate::types::{DirectoryId, DirectoryNode, PhotoNode};

/// A linked scan result.
#[derive(Debug, Clone)]
pub struct ScanTree {
    root: DirectoryNode,
    /// Child-index trail from the root, per directory id
    index: Vec<Vec<usize>>,
}

/// Assign directory ids and photo back-references throughout `root`.
pub fn link(mut root: DirectoryNode) -> ScanTree {
    let mut index = Vec::new();
    let mut trail = Vec::new();
    assign(&mut root, &mut trail, &mut index);
    ScanTree { root, index }
}

fn assign(node: &mut DirectoryNode, trail: &mut Vec<usize>, index: &mut Vec<Vec<usize>>) {
    let id = DirectoryId(index.len());
    index.push(trail.clone());
    node.id = Some(id);

    for photo in &mut node.photos {
        photo.directory = Some(id);
    }
    for (i, child) in node.directories.iter_mut().enumerate() {
        trail.push(i);
        assign(child, trail, index);
        trail.pop();
    }
}

impl ScanTree {
    /// The scan root.
    pub fn root(&self) -> &DirectoryNode {
        &self.root
    }

    pub fn into_root(self) -> DirectoryNode {
        self.root
    }

    /// Number of directories in the tree, root included.
    pub fn directory_count(&self) -> usize {
        self.index.len()
    }

    /// Number of photos in the tree.
    pub fn photo_count(&self) -> usize {
        self.photos().count()
    }

    /// Look up a directory by id.
    pub fn directory(&self, id: DirectoryId) -> Option<&DirectoryNode> {
        let trail = self.index.get(id.0)?;
        let mut node = &self.root;
        for &i in trail {
            node = node.directories.get(i)?;
        }
        Some(node)
    }

    /// The directory that owns `photo`.
    pub fn directory_of(&self, photo: &PhotoNode) -> Option<&DirectoryNode> {
        self.directory(photo.directory()?)
    }

    /// Every photo with its owning directory, in pre-order.
    pub fn photos(&self) -> impl Iterator<Item = (&DirectoryNode, &PhotoNode)> {
        let mut stack = vec![&self.root];
        let mut out = Vec::new();
        while let Some(dir) = stack.pop() {
            out.extend(dir.photos.iter().map(move |photo| (dir, photo)));
            stack.extend(dir.directories.iter().rev());
        }
        out.into_iter()
    }

    /// Absolute path of every photo under `image_root`.
    pub fn photo_paths(&self, image_root: &Path) -> Vec<PathBuf> {
        self.photos()
            .map(|(dir, photo)| photo_path(image_root, dir, photo))
            .collect()
    }
}

/// Absolute path of a photo: image root, directory path, filename.
pub fn photo_path(image_root: &Path, dir: &DirectoryNode, photo: &PhotoNode) -> PathBuf {
    let relative = dir.relative_path();
    if relative.is_empty() {
        image_root.join(&photo.name)
    } else {
        image_root.join(relative).join(&photo.name)
    }
}
