//! Optional logo image
//!
//! Logos in any format the `image` crate is built with (PNG, JPEG, GIF, BMP)
//! are decoded to 8-bit RGB with alpha flattened onto white, so the renderer
//! can embed them as a plain DeviceRGB image. A logo that fails to decode is
//! never fatal: the header falls back to the text wordmark.

use image::{ImageReader, Limits};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ReportError, Result};

/// Decoded pixel budget; larger images are rejected as undecodable
const MAX_DECODED_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB triples
    pub rgb: Vec<u8>,
}

impl LogoImage {
    /// Decode an encoded image, sniffing its format from the leading bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ReportError::AssetDecode(format!("image header: {e}")))?;

        let format = reader
            .format()
            .ok_or_else(|| ReportError::AssetDecode("unrecognized image format".to_string()))?;

        let mut limits = Limits::default();
        limits.max_alloc = Some(MAX_DECODED_BYTES);
        reader.limits(limits);

        let decoded = reader
            .decode()
            .map_err(|e| ReportError::AssetDecode(format!("{format:?}: {e}")))?
            .to_rgba8();

        let (width, height) = decoded.dimensions();
        let rgb = decoded
            .pixels()
            .flat_map(|p| {
                let [r, g, b, a] = p.0;
                [over_white(r, a), over_white(g, a), over_white(b, a)]
            })
            .collect();

        debug!("Decoded {:?} logo {}x{}", format, width, height);
        Ok(Self { width, height, rgb })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())
            .map_err(|e| ReportError::AssetDecode(format!("{:?}: {e}", path.as_ref())))?;
        Self::from_bytes(&bytes)
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Pick the logo for a report.
///
/// An explicitly supplied logo wins; only when none was supplied is the
/// default file tried. Decode failures are logged and yield `None`.
pub fn resolve_logo(uploaded: Option<&Path>, default: Option<&Path>) -> Option<LogoImage> {
    let path = match (uploaded, default) {
        (Some(p), _) => p,
        (None, Some(p)) if p.exists() => p,
        _ => return None,
    };

    match LogoImage::from_path(path) {
        Ok(logo) => Some(logo),
        Err(e) => {
            warn!("Ignoring logo {:?}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Vec::new();
        image.write_to(&mut Cursor::new(&mut out), format).unwrap();
        out
    }

    fn rgb(width: u32, height: u32, data: &[u8]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, data.to_vec()).unwrap())
    }

    #[test]
    fn test_decodes_rgb() {
        let bytes = encode(rgb(2, 1, &[255, 0, 0, 0, 0, 255]), ImageFormat::Png);
        let logo = LogoImage::from_bytes(&bytes).unwrap();
        assert_eq!((logo.width, logo.height), (2, 1));
        assert_eq!(logo.rgb, vec![255, 0, 0, 0, 0, 255]);
        assert_eq!(logo.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let image = RgbaImage::from_raw(1, 1, vec![10, 20, 30, 0]).unwrap();
        let bytes = encode(DynamicImage::ImageRgba8(image), ImageFormat::Png);
        let logo = LogoImage::from_bytes(&bytes).unwrap();
        assert_eq!(logo.rgb, vec![255, 255, 255]);
    }

    #[test]
    fn test_grayscale_expands_to_rgb() {
        let image = GrayImage::from_raw(1, 1, vec![128]).unwrap();
        let bytes = encode(DynamicImage::ImageLuma8(image), ImageFormat::Png);
        let logo = LogoImage::from_bytes(&bytes).unwrap();
        assert_eq!(logo.rgb, vec![128, 128, 128]);
    }

    #[test]
    fn test_decodes_jpeg() {
        let bytes = encode(rgb(16, 8, &[200; 16 * 8 * 3]), ImageFormat::Jpeg);
        assert!(bytes.starts_with(&[0xFF, 0xD8]));

        let logo = LogoImage::from_bytes(&bytes).unwrap();
        assert_eq!((logo.width, logo.height), (16, 8));
        assert_eq!(logo.rgb.len(), 16 * 8 * 3);
        // Lossy, but a flat fill stays close
        assert!(logo.rgb.iter().all(|&c| c.abs_diff(200) <= 4));
    }

    #[test]
    fn test_decodes_bmp_and_gif() {
        for format in [ImageFormat::Bmp, ImageFormat::Gif] {
            let bytes = encode(rgb(3, 2, &[0; 18]), format);
            let logo = LogoImage::from_bytes(&bytes).unwrap();
            assert_eq!((logo.width, logo.height), (3, 2), "{format:?}");
        }
    }

    #[test]
    fn test_garbage_is_asset_decode_error() {
        let err = LogoImage::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, ReportError::AssetDecode(_)));
    }

    #[test]
    fn test_jpeg_header_only_is_asset_decode_error() {
        let bytes = encode(rgb(16, 8, &[90; 16 * 8 * 3]), ImageFormat::Jpeg);
        let err = LogoImage::from_bytes(&bytes[..4]).unwrap_err();
        assert!(matches!(err, ReportError::AssetDecode(_)));
    }

    #[test]
    fn test_bad_uploaded_logo_does_not_fall_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let bad = dir.path().join("bad.png");
        let good = dir.path().join("good.jpg");
        fs::write(&bad, b"junk").unwrap();
        fs::write(&good, encode(rgb(1, 1, &[0, 0, 0]), ImageFormat::Jpeg)).unwrap();

        let missing = dir.path().join("missing.png");

        assert!(resolve_logo(Some(bad.as_path()), Some(good.as_path())).is_none());
        assert!(resolve_logo(None, Some(good.as_path())).is_some());
        assert!(resolve_logo(None, Some(missing.as_path())).is_none());
        assert!(resolve_logo(None, None).is_none());
    }
}
