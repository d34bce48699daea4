//! Read-only filesystem access used by the directory walker.

use async_trait::async_trait;
use std::io;
use std::path::Path;

/// What a directory entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

/// A single directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Read-only view of a filesystem: listing, type lookup and whole-file reads.
///
/// The walker only ever reads through this trait, so tests and embedders can
/// scan something other than the local disk.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// List a directory's entries in a stable order.
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<SourceEntry>>;

    /// Read a whole file.
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The local filesystem, via `tokio::fs`.
///
/// Entries are sorted by name. Entry types follow symlinks; a broken link or
/// an entry whose type cannot be read fails the listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl FileSource for LocalFs {
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<SourceEntry>> {
        let mut read_dir = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();

        while let Some(entry) = read_dir.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!("Skipping non-UTF-8 entry {:?} in {:?}", raw, path);
                    continue;
                }
            };
            let file_type = tokio::fs::metadata(entry.path()).await?.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(SourceEntry { name, kind });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_dir_sorted_with_kinds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let entries = LocalFs.list_dir(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.jpg", "c"]);
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[2].kind, EntryKind::Directory);
    }

    #[tokio::test]
    async fn test_list_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFs.list_dir(&dir.path().join("missing")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"bytes").unwrap();
        assert_eq!(LocalFs.read_file(&dir.path().join("a.jpg")).await.unwrap(), b"bytes");
    }
}
