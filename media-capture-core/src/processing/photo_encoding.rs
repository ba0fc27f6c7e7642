use std::io::Cursor;

use image::{imageops, ImageFormat, RgbaImage};

use crate::models::error::CaptureError;

/// Mime of encoded still captures.
pub const PHOTO_MIME_TYPE: &str = "image/png";

/// Encode a rendered frame as PNG (lossless, keeps the alpha channel).
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| CaptureError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer.into_inner())
}

/// Downscale so the longest edge is at most `max_edge`, keeping the aspect
/// ratio. Images already small enough are returned unchanged.
///
/// Returns `None` when `max_edge` is zero (thumbnails disabled) or the image
/// is empty.
pub fn thumbnail(image: &RgbaImage, max_edge: u32) -> Option<RgbaImage> {
    let (width, height) = image.dimensions();
    if max_edge == 0 || width == 0 || height == 0 {
        return None;
    }

    let longest = width.max(height);
    if longest <= max_edge {
        return Some(image.clone());
    }

    let scale = max_edge as f64 / longest as f64;
    let thumb_width = ((width as f64 * scale).round() as u32).max(1);
    let thumb_height = ((height as f64 * scale).round() as u32).max(1);
    Some(imageops::thumbnail(image, thumb_width, thumb_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_round_trips_pixels() {
        let frame = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 50, y as u8 * 80, 7, 200]));
        let png = encode_png(&frame).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn thumbnail_keeps_aspect_ratio() {
        let frame = RgbaImage::new(1920, 1080);
        let thumb = thumbnail(&frame, 320).unwrap();
        assert_eq!(thumb.dimensions(), (320, 180));

        let portrait = RgbaImage::new(480, 854);
        assert_eq!(thumbnail(&portrait, 320).unwrap().dimensions(), (180, 320));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let frame = RgbaImage::new(64, 48);
        assert_eq!(thumbnail(&frame, 320).unwrap().dimensions(), (64, 48));
    }

    #[test]
    fn zero_edge_disables_thumbnails() {
        assert!(thumbnail(&RgbaImage::new(10, 10), 0).is_none());
        assert!(thumbnail(&RgbaImage::new(0, 0), 320).is_none());
    }
}
