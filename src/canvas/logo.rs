use std::io::Cursor;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::ImageFormat;

use crate::canvas::model::LogoImage;

/// Fits (width, height) into the bounds keeping the aspect ratio. Landscape images are
/// bounded by width, everything else by height; nothing is upscaled.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let (mut w, mut h) = (width as f32, height as f32);
    if w > h {
        if w > max_width as f32 {
            h *= max_width as f32 / w;
            w = max_width as f32;
        }
    } else if h > max_height as f32 {
        w *= max_height as f32 / h;
        h = max_height as f32;
    }
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Decodes an uploaded logo, shrinks it to the bounds and re-encodes it as PNG.
pub fn prepare_logo(bytes: &[u8], max_width: u32, max_height: u32) -> image::ImageResult<LogoImage> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = fit_within(decoded.width(), decoded.height(), max_width, max_height);
    let pixels = if (width, height) == decoded.dimensions() {
        decoded
    } else {
        imageops::resize(&decoded, width, height, FilterType::Lanczos3)
    };

    let mut png = Vec::new();
    pixels.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    tracing::debug!(width, height, bytes = png.len(), "logo prepared");

    Ok(LogoImage {
        png: Arc::new(png),
        pixels: Arc::new(pixels),
    })
}

/// Decodes a PNG previously produced by [`prepare_logo`], e.g. from a saved design.
pub fn decode_logo(png: Vec<u8>) -> image::ImageResult<LogoImage> {
    let pixels = image::load_from_memory_with_format(&png, ImageFormat::Png)?.to_rgba8();
    Ok(LogoImage {
        png: Arc::new(png),
        pixels: Arc::new(pixels),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn encoded_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |_x, _y| Rgb([120_u8, 40_u8, 200_u8]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .expect("jpeg should encode");
        bytes
    }

    #[test]
    fn wide_images_are_bounded_by_width() {
        assert_eq!(fit_within(800, 400, 400, 400), (400, 200));
    }

    #[test]
    fn tall_and_square_images_are_bounded_by_height() {
        assert_eq!(fit_within(300, 900, 400, 400), (133, 400));
        assert_eq!(fit_within(1000, 1000, 400, 400), (400, 400));
    }

    #[test]
    fn small_images_are_never_upscaled() {
        assert_eq!(fit_within(120, 80, 400, 400), (120, 80));
    }

    #[test]
    fn prepared_logo_is_resized_png() {
        let logo = prepare_logo(&encoded_jpeg(1000, 500), 400, 400).expect("logo should prepare");
        assert_eq!(logo.pixels.dimensions(), (400, 200));
        assert_eq!(
            image::guess_format(&logo.png).expect("format"),
            ImageFormat::Png
        );

        let decoded = decode_logo(logo.png.as_ref().clone()).expect("png should decode");
        assert_eq!(decoded.pixels.dimensions(), (400, 200));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(prepare_logo(b"not an image", 400, 400).is_err());
    }
}
