//! Repair for IPTC text stored as UTF-8 but decoded one byte per character.

use thiserror::Error;

/// The text ended on a `0xC0..=0xC3` lead with no continuation after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("truncated two-byte sequence: lead {lead:#04X} at position {position} ends the text")]
pub struct TruncatedSequence {
    pub lead: u32,
    pub position: usize,
}

/// Decode IPTC bytes one byte per character (ISO-8859-1).
pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Recombine two-byte UTF-8 sequences that were decoded as Latin-1.
///
/// Scans left to right. A character with the high bit set consumes the
/// following slot: if it is a `0xC0..=0xC3` lead and the follower is a
/// `10xxxxxx` continuation, the pair becomes the code point they encode;
/// otherwise the pair becomes U+0080. A trailing `0xC0..=0xC3` lead is an
/// error; any other trailing high-bit character becomes U+0080.
pub fn repair_text(text: &str) -> Result<String, TruncatedSequence> {
    let chars: Vec<u32> = text.chars().map(u32::from).collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let a = chars[i];
        if a & 0x80 == 0 {
            out.extend(char::from_u32(a));
            i += 1;
            continue;
        }

        let lead = a & 0xFC == 0xC0;
        let repaired = match chars.get(i + 1) {
            Some(&b) if lead && b & 0xC0 == 0x80 => ((a & 0x03) << 6) + (b & 0x3F),
            None if lead => return Err(TruncatedSequence { lead: a, position: i }),
            _ => 0x80,
        };
        out.extend(char::from_u32(repaired));
        i += 2;
    }

    Ok(out)
}
