//! Serializing scan results as JSON or JSON Lines.
//!
//! JSON output is the scan root with its whole nested tree. JSON Lines output
//! flattens the tree into one [`PhotoRecord`] per photo, in pre-order.

use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::scan::{photo_path, ScanTree};
use crate::types::{DirectoryNode, PhotoMetadata, PhotoNode};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The directory tree as one JSON document
    Json,
    /// One photo record per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// A flattened photo: where it lives and what was extracted from it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord<'a> {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Library-relative path of the owning directory
    pub directory: String,
    pub name: &'a str,
    pub metadata: &'a PhotoMetadata,
}

impl<'a> PhotoRecord<'a> {
    pub fn new(image_root: &Path, dir: &DirectoryNode, photo: &'a PhotoNode) -> Self {
        Self {
            path: photo_path(image_root, dir, photo),
            directory: dir.relative_path(),
            name: &photo.name,
            metadata: &photo.metadata,
        }
    }
}

/// Writes scan trees in the configured format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    records_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects [`OutputFormat::Json`]; JSON Lines is always
    /// one compact object per line.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            records_written: 0,
        }
    }

    /// Write a linked tree. `image_root` anchors the absolute photo paths
    /// in JSON Lines output.
    pub fn write_tree(&mut self, tree: &ScanTree, image_root: &Path) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, tree.root())
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, tree.root())
                        .map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.records_written += 1;
            }
            OutputFormat::JsonLines => {
                for (dir, photo) in tree.photos() {
                    let record = PhotoRecord::new(image_root, dir, photo);
                    serde_json::to_writer(&mut self.writer, &record).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                    self.records_written += 1;
                }
            }
        }
        Ok(())
    }

    /// Number of JSON documents or lines written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
