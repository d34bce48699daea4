//! Extension-based image classification.

use std::path::Path;

/// Raster content types the library accepts.
const IMAGE_MIME_TYPES: &[&str] = &[
    "image/bmp",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/pjpeg",
    "image/tiff",
    "image/webp",
    "image/x-tiff",
    "image/x-windows-bmp",
];

/// Decides whether a directory entry is a supported photo.
///
/// The decision uses the file extension only; file content is never sniffed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageClassifier;

impl ImageClassifier {
    /// Check if a path names a supported image.
    pub fn is_image(path: &Path) -> bool {
        Self::content_type(path)
            .map(|mime| IMAGE_MIME_TYPES.contains(&mime))
            .unwrap_or(false)
    }

    /// Resolve a content type from the file extension (case-insensitive).
    ///
    /// The extension is whatever follows the last `.` of the file name, so a
    /// dotfile such as `.jpg` has the extension `jpg`.
    pub fn content_type(path: &Path) -> Option<&'static str> {
        let (_, ext) = path.file_name()?.to_str()?.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        let mime = match ext.as_str() {
            "bmp" | "dib" => "image/bmp",
            "gif" => "image/gif",
            "jpg" | "jpeg" | "jpe" => "image/jpeg",
            "jfif" | "pjpeg" | "pjp" => "image/pjpeg",
            "png" => "image/png",
            "tif" | "tiff" => "image/tiff",
            "webp" => "image/webp",
            "svg" | "svgz" => "image/svg+xml",
            "ico" => "image/x-icon",
            "heic" => "image/heic",
            "txt" => "text/plain",
            "json" => "application/json",
            "mp4" | "m4v" => "video/mp4",
            "mov" => "video/quicktime",
            _ => return None,
        };
        Some(mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        for name in [
            "a.bmp", "a.gif", "a.jpg", "a.jpeg", "a.JPG", "a.jfif", "a.png", "a.tif", "a.tiff",
            "a.webp",
        ] {
            assert!(ImageClassifier::is_image(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn test_rejects_non_raster_types() {
        for name in ["a.txt", "a.mp4", "a.svg", "a.heic", "a.ico", "README", "jpg", "a.jpg."] {
            assert!(!ImageClassifier::is_image(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn test_dotfile_named_like_an_extension() {
        assert!(ImageClassifier::is_image(Path::new(".jpg")));
        assert!(ImageClassifier::is_image(Path::new("/lib/2020/.PNG")));
        assert!(!ImageClassifier::is_image(Path::new(".hidden")));
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        assert_eq!(
            ImageClassifier::content_type(Path::new("IMG_0001.JPeG")),
            Some("image/jpeg")
        );
        assert_eq!(ImageClassifier::content_type(Path::new("clip.mp4")), Some("video/mp4"));
        assert_eq!(ImageClassifier::content_type(Path::new("archive.xyz")), None);
    }
}
