//! Encoded and decoded forms of the session image.

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use web_time::Instant;

use crate::error::{EditorError, Result};

/// MIME type used for every image the engine produces itself.
pub const PNG_MIME: &str = "image/png";

/// Image file bytes plus MIME type.
///
/// Bytes are reference counted so history entries that share an image
/// share one buffer.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    bytes: Arc<[u8]>,
    mime: Arc<str>,
}

impl EncodedImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<Arc<str>>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Cheap identity check first, then byte comparison.
    pub fn same_as(&self, other: &EncodedImage) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes) || self.bytes[..] == other.bytes[..]
    }
}

impl PartialEq for EncodedImage {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// A decoded image together with the bytes it came from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    encoded: EncodedImage,
    pixels: DynamicImage,
}

impl SourceImage {
    /// Decode image bytes, sniffing the format from the content.
    ///
    /// The MIME type is advisory and only used as a fallback hint.
    pub fn decode(encoded: EncodedImage) -> Result<Self> {
        let started = Instant::now();
        let pixels = match image::load_from_memory(encoded.bytes()) {
            Ok(pixels) => pixels,
            Err(sniff_err) => {
                let Some(format) = ImageFormat::from_mime_type(encoded.mime()) else {
                    return Err(EditorError::decode(sniff_err));
                };
                image::load_from_memory_with_format(encoded.bytes(), format)
                    .map_err(EditorError::decode)?
            }
        };
        log::debug!(
            "Decoded {}x{} {} image ({} bytes) in {:.1?}",
            pixels.width(),
            pixels.height(),
            encoded.mime(),
            encoded.len(),
            started.elapsed()
        );
        Ok(Self { encoded, pixels })
    }

    pub fn encoded(&self) -> &EncodedImage {
        &self.encoded
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Size as floats, for stage math.
    pub fn size(&self) -> (f32, f32) {
        (self.width() as f32, self.height() as f32)
    }
}

/// Encode any image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(EditorError::Encode)?;
    Ok(buffer.into_inner())
}


#[cfg(test)]
mod tests {
    use super::test_support::png;
    use super::*;

    #[test]
    fn test_decode_png() {
        let image = SourceImage::decode(png(40, 30)).expect("decode");
        assert_eq!(image.width(), 40);
        assert_eq!(image.height(), 30);
        assert_eq!(image.size(), (40.0, 30.0));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let bad = EncodedImage::new(vec![0u8, 1, 2, 3, 4, 5, 6, 7], "image/png");
        let err = SourceImage::decode(bad).unwrap_err();
        assert!(matches!(err, EditorError::Decode { .. }));
    }

    #[test]
    fn test_same_as() {
        let a = png(4, 4);
        let b = a.clone();
        let c = png(4, 4);
        let d = png(5, 4);
        assert!(a.same_as(&b));
        assert!(a.same_as(&c)); // equal bytes, different buffers
        assert!(!a.same_as(&d));
    }
}
