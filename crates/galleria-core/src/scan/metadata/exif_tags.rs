//! EXIF camera and GPS fields, read with `kamadak-exif`.

use exif::{Exif, In, Reader, Tag, Value};
use std::io::Cursor;

use crate::types::{CameraData, GpsData};

/// Parse the EXIF block of an image container.
///
/// A container without an EXIF block yields `Ok(None)`; a block that is
/// present but malformed is an error.
pub(super) fn read_exif(bytes: &[u8]) -> Result<Option<Exif>, exif::Error> {
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Camera settings; missing tags stay `None`.
pub(super) fn camera_data(exif: &Exif) -> CameraData {
    CameraData {
        iso: get_uint(exif, Tag::PhotographicSensitivity),
        model: get_ascii(exif, Tag::Model),
        maker: get_ascii(exif, Tag::Make),
        f_stop: get_rational(exif, Tag::FNumber),
        exposure: get_rational(exif, Tag::ExposureTime),
        focal_length: get_rational(exif, Tag::FocalLength),
        lens: get_ascii(exif, Tag::LensModel),
    }
}

/// GPS position in signed decimal degrees and meters.
pub(super) fn gps_data(exif: &Exif) -> GpsData {
    GpsData {
        latitude: get_gps_coord(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef),
        longitude: get_gps_coord(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef),
        altitude: get_altitude(exif),
    }
}

/// Get the first string of an ASCII field, without NUL padding.
fn get_ascii(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(values) => {
            let raw = String::from_utf8_lossy(values.first()?);
            let s = raw.trim_end_matches('\0').trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    }
}

/// Get an unsigned integer field (BYTE, SHORT or LONG).
fn get_uint(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)?.value.get_uint(0)
}

/// Get a RATIONAL field as a float; a zero denominator counts as missing.
fn get_rational(exif: &Exif, tag: Tag) -> Option<f64> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(v) => v.first().map(|r| r.to_f64()).filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Get a GPS coordinate, converting degrees/minutes/seconds to decimal.
fn get_gps_coord(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let degrees = match &exif.get_field(coord_tag, In::PRIMARY)?.value {
        Value::Rational(r) if r.len() >= 3 => {
            r[0].to_f64() + r[1].to_f64() / 60.0 + r[2].to_f64() / 3600.0
        }
        _ => return None,
    };
    if !degrees.is_finite() {
        return None;
    }

    // South and West are negative
    let negative = get_ascii(exif, ref_tag)
        .map(|r| r.starts_with('S') || r.starts_with('W'))
        .unwrap_or(false);

    Some(if negative { -degrees } else { degrees })
}

/// Get the altitude; reference 1 means below sea level.
fn get_altitude(exif: &Exif) -> Option<f64> {
    let altitude = get_rational(exif, Tag::GPSAltitude)?;
    let below_sea_level = get_uint(exif, Tag::GPSAltitudeRef) == Some(1);
    Some(if below_sea_level { -altitude } else { altitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg_with_segments, plain_jpeg, sample_exif, tiff_le, IfdEntry};

    #[test]
    fn test_camera_fields() {
        let jpeg = jpeg_with_segments(&plain_jpeg(8, 8), Some(&sample_exif()), None);
        let exif = read_exif(&jpeg).unwrap().unwrap();
        let camera = camera_data(&exif);

        assert_eq!(camera.maker.as_deref(), Some("Fujifilm"));
        assert_eq!(camera.model.as_deref(), Some("X100V"));
        assert_eq!(camera.iso, Some(400));
        assert_eq!(camera.f_stop, Some(2.8));
        assert_eq!(camera.exposure, Some(0.004));
        assert_eq!(camera.focal_length, Some(23.0));
        assert_eq!(camera.lens.as_deref(), Some("Fujinon 23mm"));
    }

    #[test]
    fn test_gps_fields_are_signed() {
        let jpeg = jpeg_with_segments(&plain_jpeg(8, 8), Some(&sample_exif()), None);
        let exif = read_exif(&jpeg).unwrap().unwrap();
        let gps = gps_data(&exif);

        assert!((gps.latitude.unwrap() - 59.9).abs() < 1e-9);
        assert!((gps.longitude.unwrap() + 10.75).abs() < 1e-9);
        assert_eq!(gps.altitude, Some(-12.0));
    }

    #[test]
    fn test_missing_tags_are_none() {
        let tiff = tiff_le(&[IfdEntry::ascii(0x010F, "Leica")], &[], &[]);
        let jpeg = jpeg_with_segments(&plain_jpeg(8, 8), Some(&tiff), None);
        let exif = read_exif(&jpeg).unwrap().unwrap();

        let camera = camera_data(&exif);
        assert_eq!(camera.maker.as_deref(), Some("Leica"));
        assert!(camera.model.is_none());
        assert!(camera.iso.is_none());
        assert_eq!(gps_data(&exif), GpsData::default());
    }

    #[test]
    fn test_jpeg_without_exif() {
        assert!(read_exif(&plain_jpeg(8, 8)).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_exif_block_is_an_error() {
        let garbage = b"XX\x00\x2A\x00\x00\x00\x08";
        let jpeg = jpeg_with_segments(&plain_jpeg(8, 8), Some(garbage), None);
        assert!(read_exif(&jpeg).is_err());
    }
}
