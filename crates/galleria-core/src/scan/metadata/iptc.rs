//! IPTC-IIM parsing for JPEG and TIFF containers.
//!
//! Extracts from IPTC Record 2:
//! - Keywords (2:25), repeatable
//! - City (2:90), Province/State (2:95), Country (2:101)
//! - Date Created (2:55) and Time Created (2:60)
//!
//! For JPEG the IIM block lives in an APP13 segment (Photoshop 8BIM resource
//! 0x0404); for TIFF in IFD tag 33723 (raw IIM) or 34377 (8BIM resources).
//! Text is returned exactly as stored, decoded one byte per character.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use super::text::latin1_decode;

/// IPTC fields relevant to a photo record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IptcData {
    pub keywords: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub date_created: Option<String>,
    pub time_created: Option<String>,
}

impl IptcData {
    /// Combine Date Created and Time Created into a timestamp.
    ///
    /// The date is `CCYYMMDD`; the time is `HHMMSS` with an optional `±HHMM`
    /// offset. A missing time means midnight, a missing offset means UTC.
    /// Returns `None` when the date is absent or not a valid date.
    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        let date = NaiveDate::parse_from_str(self.date_created.as_deref()?.trim(), "%Y%m%d").ok()?;

        let (time, offset) = match self.time_created.as_deref().map(str::trim) {
            Some(t) if t.len() >= 6 && t.is_char_boundary(6) => {
                let time = NaiveTime::parse_from_str(&t[..6], "%H%M%S").ok()?;
                (time, parse_offset(&t[6..])?)
            }
            _ => (NaiveTime::from_hms_opt(0, 0, 0)?, Utc.fix()),
        };

        offset
            .from_local_datetime(&date.and_time(time))
            .single()
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s.is_empty() {
        return Some(Utc.fix());
    }
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Read IPTC metadata from a file's bytes, dispatching on the container.
///
/// Returns `Ok(None)` when the container carries no IPTC block and an error
/// when a block is present but its datasets are truncated.
pub fn read_iptc(bytes: &[u8]) -> Result<Option<IptcData>, String> {
    let block = if bytes.starts_with(&[0xFF, 0xD8]) {
        find_jpeg_app13_iptc(bytes)
    } else if bytes.starts_with(b"II") || bytes.starts_with(b"MM") {
        find_tiff_iptc(bytes)
    } else {
        None
    };

    block.map(parse_iptc_iim).transpose()
}

// ---------------------------------------------------------------------------
// IPTC-IIM record parsing
// ---------------------------------------------------------------------------

const TAG_MARKER: u8 = 0x1C;
const APPLICATION_RECORD: u8 = 2;

/// Parse raw IPTC-IIM bytes.
///
/// Each dataset: `0x1C`, record number, dataset number, big-endian u16
/// length, then data. A length with the high bit set is an extended length:
/// its low 15 bits give the byte count of the real length that follows.
pub fn parse_iptc_iim(data: &[u8]) -> Result<IptcData, String> {
    let mut result = IptcData::default();
    let mut pos = 0;

    while pos < data.len() {
        if data[pos] != TAG_MARKER {
            // Padding after the last dataset is common
            pos += 1;
            continue;
        }
        if pos + 5 > data.len() {
            return Err(format!("dataset header truncated at offset {pos}"));
        }

        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let raw_len = u16::from_be_bytes([data[pos + 3], data[pos + 4]]);
        pos += 5;

        let length = if raw_len & 0x8000 != 0 {
            let width = usize::from(raw_len & 0x7FFF);
            if width == 0 || width > 4 || pos + width > data.len() {
                return Err(format!("bad extended length at offset {pos}"));
            }
            let len = data[pos..pos + width]
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
            pos += width;
            len
        } else {
            usize::from(raw_len)
        };

        if pos + length > data.len() {
            return Err(format!(
                "dataset {record}:{dataset} needs {length} bytes, {} left",
                data.len() - pos
            ));
        }

        if record == APPLICATION_RECORD {
            let value = latin1_decode(&data[pos..pos + length]);
            match dataset {
                25 => result.keywords.push(value),
                55 => result.date_created = Some(value),
                60 => result.time_created = Some(value),
                90 => result.city = Some(value),
                95 => result.state = Some(value),
                101 => result.country = Some(value),
                _ => {}
            }
        }

        pos += length;
    }

    Ok(result)
}

// ---------------------------------------------------------------------------
// JPEG: IPTC from APP13 / Photoshop 8BIM
// ---------------------------------------------------------------------------

const PHOTOSHOP_HEADER: &[u8] = b"Photoshop 3.0\0";
const BIM_MARKER: &[u8] = b"8BIM";
const IPTC_RESOURCE_ID: u16 = 0x0404;

/// Find the raw IPTC-IIM bytes inside a JPEG's APP13 segment.
fn find_jpeg_app13_iptc(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // Fill byte
            0xFF => {
                pos += 1;
                continue;
            }
            // Markers without a length field
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            // Start of scan or end of image: no more metadata segments
            0xDA | 0xD9 => return None,
            _ => {}
        }

        let seg_len = usize::from(u16::from_be_bytes([data[pos + 2], data[pos + 3]]));
        if seg_len < 2 {
            return None;
        }
        let seg_end = (pos + 2 + seg_len).min(data.len());

        if marker == 0xED {
            if let Some(iptc) = extract_iptc_from_8bim(&data[pos + 4..seg_end]) {
                return Some(iptc);
            }
        }
        pos += 2 + seg_len;
    }
    None
}

/// Extract IPTC-IIM bytes from a Photoshop 8BIM resource block.
fn extract_iptc_from_8bim(segment: &[u8]) -> Option<&[u8]> {
    let data = segment.strip_prefix(PHOTOSHOP_HEADER).unwrap_or(segment);

    let mut pos = 0;
    while pos + 12 <= data.len() {
        // Each resource: "8BIM", id (2), pascal name padded to even, size (4), data
        if &data[pos..pos + 4] != BIM_MARKER {
            pos += 1;
            continue;
        }
        pos += 4;

        let resource_id = u16::from_be_bytes([data[pos], data[pos + 1]]);
        pos += 2;

        let pascal_len = usize::from(data[pos]);
        pos += 1 + pascal_len + ((1 + pascal_len) % 2);

        let size_bytes = data.get(pos..pos + 4)?;
        let res_len =
            u32::from_be_bytes([size_bytes[0], size_bytes[1], size_bytes[2], size_bytes[3]])
                as usize;
        pos += 4;

        let body = data.get(pos..pos.checked_add(res_len)?)?;
        if resource_id == IPTC_RESOURCE_ID {
            return Some(body);
        }
        pos += res_len + (res_len % 2);
    }

    None
}

// ---------------------------------------------------------------------------
// TIFF: IPTC from IFD tags
// ---------------------------------------------------------------------------

const TAG_IPTC_NAA: u16 = 33723;
const TAG_PHOTOSHOP: u16 = 34377;

/// Find IPTC-IIM bytes in a TIFF file's IFD chain.
fn find_tiff_iptc(data: &[u8]) -> Option<&[u8]> {
    let big_endian = match data.get(0..2)? {
        b"MM" => true,
        b"II" => false,
        _ => return None,
    };
    let read_u16 = |offset: usize| -> Option<u16> {
        let b = data.get(offset..offset + 2)?;
        Some(if big_endian {
            u16::from_be_bytes([b[0], b[1]])
        } else {
            u16::from_le_bytes([b[0], b[1]])
        })
    };
    let read_u32 = |offset: usize| -> Option<u32> {
        let b = data.get(offset..offset + 4)?;
        let b = [b[0], b[1], b[2], b[3]];
        Some(if big_endian {
            u32::from_be_bytes(b)
        } else {
            u32::from_le_bytes(b)
        })
    };
    // Byte size of one value of each TIFF field type
    let type_size = |typ: u16| -> usize {
        match typ {
            3 | 8 => 2,
            4 | 9 | 11 => 4,
            5 | 10 | 12 => 8,
            _ => 1,
        }
    };

    if read_u16(2)? != 42 {
        return None;
    }

    let mut ifd_offset = read_u32(4)? as usize;
    // A malicious file can link IFDs in a loop
    let mut hops = 0;
    while ifd_offset > 0 && hops < 16 {
        hops += 1;
        let entry_count = usize::from(read_u16(ifd_offset)?);
        let entries_start = ifd_offset + 2;

        for i in 0..entry_count {
            let entry = entries_start + i * 12;
            let tag = read_u16(entry)?;
            if tag != TAG_IPTC_NAA && tag != TAG_PHOTOSHOP {
                continue;
            }
            let byte_len = read_u32(entry + 4)? as usize * type_size(read_u16(entry + 2)?);
            let value = if byte_len <= 4 {
                data.get(entry + 8..entry + 8 + byte_len)
            } else {
                let offset = read_u32(entry + 8)? as usize;
                data.get(offset..offset.checked_add(byte_len)?)
            };
            let Some(value) = value else { continue };

            if tag == TAG_IPTC_NAA {
                return Some(value);
            }
            if let Some(iptc) = extract_iptc_from_8bim(value) {
                return Some(iptc);
            }
        }

        ifd_offset = read_u32(entries_start + entry_count * 12)? as usize;
    }

    None
}
