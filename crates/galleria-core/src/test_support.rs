//! Builders for synthetic photos used across the test suite.
//!
//! Real JPEG pixel data comes from the `image` encoder; EXIF and IPTC blocks
//! are assembled by hand and spliced in after the SOI marker.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scan::{EntryKind, FileSource, SourceEntry};

/// Encode a small solid-color JPEG.
pub(crate) fn plain_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 80, 40]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// Encode a small solid-color PNG.
pub(crate) fn plain_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 200, 90]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Insert an APP1 (EXIF) and/or APP13 (IPTC) segment after the SOI marker.
pub(crate) fn jpeg_with_segments(jpeg: &[u8], exif: Option<&[u8]>, iptc: Option<&[u8]>) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let mut out = vec![0xFF, 0xD8];

    if let Some(tiff) = exif {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(tiff);
        push_segment(&mut out, 0xE1, &payload);
    }

    if let Some(iim) = iptc {
        let mut payload = b"Photoshop 3.0\0".to_vec();
        payload.extend_from_slice(b"8BIM");
        payload.extend_from_slice(&0x0404u16.to_be_bytes());
        // Empty pascal name, padded to even length
        payload.extend_from_slice(&[0, 0]);
        payload.extend_from_slice(&(iim.len() as u32).to_be_bytes());
        payload.extend_from_slice(iim);
        if iim.len() % 2 == 1 {
            payload.push(0);
        }
        push_segment(&mut out, 0xED, &payload);
    }

    out.extend_from_slice(&jpeg[2..]);
    out
}

fn push_segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    out.extend_from_slice(&[0xFF, marker]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
}

/// One IPTC Record 2 dataset.
pub(crate) fn iim(dataset: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![0x1C, 0x02, dataset];
    out.extend_from_slice(&(value.len() as u16).to_be_bytes());
    out.extend_from_slice(value);
    out
}

/// A single IFD entry for the little-endian TIFF builder.
#[derive(Clone)]
pub(crate) struct IfdEntry {
    tag: u16,
    typ: u16,
    count: u32,
    data: Vec<u8>,
}

impl IfdEntry {
    pub(crate) fn ascii(tag: u16, value: &str) -> Self {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            typ: 2,
            count: data.len() as u32,
            data,
        }
    }

    pub(crate) fn byte(tag: u16, value: u8) -> Self {
        Self {
            tag,
            typ: 1,
            count: 1,
            data: vec![value],
        }
    }

    pub(crate) fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            typ: 3,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    pub(crate) fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            typ: 4,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    pub(crate) fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let data = values
            .iter()
            .flat_map(|(num, den)| num.to_le_bytes().into_iter().chain(den.to_le_bytes()))
            .collect();
        Self {
            tag,
            typ: 5,
            count: values.len() as u32,
            data,
        }
    }
}

const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_GPS_IFD: u16 = 0x8825;

/// Lay out a little-endian TIFF with IFD0 plus optional EXIF and GPS sub-IFDs.
pub(crate) fn tiff_le(ifd0: &[IfdEntry], exif: &[IfdEntry], gps: &[IfdEntry]) -> Vec<u8> {
    let ifd_len = |n: usize| 2 + 12 * n + 4;
    let subs: Vec<(u16, &[IfdEntry])> = [(TAG_EXIF_IFD, exif), (TAG_GPS_IFD, gps)]
        .into_iter()
        .filter(|(_, entries)| !entries.is_empty())
        .collect();

    let mut primary = ifd0.to_vec();
    let mut offset = 8 + ifd_len(ifd0.len() + subs.len());
    let mut ifds: Vec<Vec<IfdEntry>> = Vec::new();
    for (pointer_tag, entries) in &subs {
        primary.push(IfdEntry::long(*pointer_tag, offset as u32));
        offset += ifd_len(entries.len());
        ifds.push(entries.to_vec());
    }
    ifds.insert(0, primary);

    let mut data_offset = offset;
    let mut out = b"II".to_vec();
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    let mut data = Vec::new();

    for ifd in &ifds {
        out.extend_from_slice(&(ifd.len() as u16).to_le_bytes());
        for entry in ifd {
            out.extend_from_slice(&entry.tag.to_le_bytes());
            out.extend_from_slice(&entry.typ.to_le_bytes());
            out.extend_from_slice(&entry.count.to_le_bytes());
            if entry.data.len() <= 4 {
                let mut inline = entry.data.clone();
                inline.resize(4, 0);
                out.extend_from_slice(&inline);
            } else {
                out.extend_from_slice(&(data_offset as u32).to_le_bytes());
                data.extend_from_slice(&entry.data);
                data_offset += entry.data.len();
                if entry.data.len() % 2 == 1 {
                    data.push(0);
                    data_offset += 1;
                }
            }
        }
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    out.extend_from_slice(&data);
    out
}

/// EXIF block for a Fujifilm X100V shot near Oslo.
pub(crate) fn sample_exif() -> Vec<u8> {
    tiff_le(
        &[
            IfdEntry::ascii(0x010F, "Fujifilm"),
            IfdEntry::ascii(0x0110, "X100V"),
        ],
        &[
            IfdEntry::rationals(0x829A, &[(1, 250)]),
            IfdEntry::rationals(0x829D, &[(28, 10)]),
            IfdEntry::short(0x8827, 400),
            IfdEntry::rationals(0x920A, &[(23, 1)]),
            IfdEntry::ascii(0xA434, "Fujinon 23mm"),
        ],
        &[
            IfdEntry::ascii(0x0001, "N"),
            IfdEntry::rationals(0x0002, &[(59, 1), (54, 1), (0, 1)]),
            IfdEntry::ascii(0x0003, "W"),
            IfdEntry::rationals(0x0004, &[(10, 1), (45, 1), (0, 1)]),
            IfdEntry::byte(0x0005, 1),
            IfdEntry::rationals(0x0006, &[(12, 1)]),
        ],
    )
}

/// Write bytes to `dir/name`, creating parent directories.
pub(crate) fn write_file(dir: &Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

struct MemoryFile {
    bytes: Option<Vec<u8>>,
    delay: Duration,
}

/// An in-memory [`FileSource`] with per-file read delays and failures.
///
/// Directories exist implicitly as ancestors of the files added.
#[derive(Default)]
pub(crate) struct MemorySource {
    files: BTreeMap<PathBuf, MemoryFile>,
}

impl MemorySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn file(self, path: &str, bytes: Vec<u8>) -> Self {
        self.file_with_delay(path, bytes, Duration::ZERO)
    }

    pub(crate) fn file_with_delay(mut self, path: &str, bytes: Vec<u8>, delay: Duration) -> Self {
        self.files.insert(
            PathBuf::from(path),
            MemoryFile {
                bytes: Some(bytes),
                delay,
            },
        );
        self
    }

    /// A file that lists normally but fails to read.
    pub(crate) fn unreadable(mut self, path: &str) -> Self {
        self.files.insert(
            PathBuf::from(path),
            MemoryFile {
                bytes: None,
                delay: Duration::ZERO,
            },
        );
        self
    }
}

#[async_trait]
impl FileSource for MemorySource {
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<SourceEntry>> {
        let mut entries = BTreeMap::new();
        for file in self.files.keys() {
            let Ok(rest) = file.strip_prefix(path) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let kind = if components.next().is_some() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.insert(first.as_os_str().to_string_lossy().into_owned(), kind);
        }

        if entries.is_empty() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(entries
            .into_iter()
            .map(|(name, kind)| SourceEntry { name, kind })
            .collect())
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let file = self
            .files
            .get(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        tokio::time::sleep(file.delay).await;
        file.bytes
            .clone()
            .ok_or_else(|| io::Error::from(io::ErrorKind::PermissionDenied))
    }
}
