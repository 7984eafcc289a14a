//! Upload checks that run before any bytes are decoded.

use image::ImageFormat;

use crate::error::{EditorError, Result};

/// Which upload slot a file is headed for; each accepts different formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadKind {
    BaseImage,
    Prop,
}

impl UploadKind {
    pub fn accepted_formats(self) -> &'static [ImageFormat] {
        match self {
            UploadKind::BaseImage => &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP],
            UploadKind::Prop => &[ImageFormat::Png, ImageFormat::WebP],
        }
    }

    pub fn accepted_label(self) -> &'static str {
        match self {
            UploadKind::BaseImage => "JPG, PNG, WEBP",
            UploadKind::Prop => "PNG, WEBP",
        }
    }

    /// Extensions offered by file pickers.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            UploadKind::BaseImage => &["jpg", "jpeg", "png", "webp"],
            UploadKind::Prop => &["png", "webp"],
        }
    }
}

/// Check the sniffed format, then the size. Returns the detected format.
pub fn validate_upload(
    name: &str,
    bytes: &[u8],
    kind: UploadKind,
    max_bytes: u64,
) -> Result<ImageFormat> {
    let format = image::guess_format(bytes)
        .ok()
        .filter(|f| kind.accepted_formats().contains(f))
        .ok_or_else(|| EditorError::UnsupportedFormat {
            name: name.to_string(),
            accepted: kind.accepted_label(),
        })?;

    if bytes.len() as u64 > max_bytes {
        return Err(EditorError::FileTooLarge {
            name: name.to_string(),
            max_mb: max_bytes / (1024 * 1024),
        });
    }

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn jpeg_is_a_base_image_but_not_a_prop() {
        let jpeg = encoded(ImageFormat::Jpeg);
        assert_eq!(
            validate_upload("a.jpg", &jpeg, UploadKind::BaseImage, 1 << 20).unwrap(),
            ImageFormat::Jpeg
        );
        assert!(matches!(
            validate_upload("a.jpg", &jpeg, UploadKind::Prop, 1 << 20),
            Err(EditorError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn oversize_file_is_rejected() {
        let png = encoded(ImageFormat::Png);
        let err = validate_upload("big.png", &png, UploadKind::Prop, 10).unwrap_err();
        assert!(matches!(err, EditorError::FileTooLarge { max_mb: 0, .. }));
    }

    #[test]
    fn unknown_bytes_are_rejected() {
        assert!(matches!(
            validate_upload("notes.txt", b"hello", UploadKind::BaseImage, 1 << 20),
            Err(EditorError::UnsupportedFormat { .. })
        ));
    }
}
