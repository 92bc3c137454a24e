use image::imageops;
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};

use crate::canvas::model::{Canvas, LogoElement, ObjectKind, TextElement};
use crate::canvas::style::Color;
use crate::canvas::text::TextLayout;

const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// A text layer may span at most this many times the longer canvas edge.
const MAX_LAYER_SCALE: u32 = 4;

/// Rasterizes the whole canvas: background with its filter, then objects in document order.
pub fn render(canvas: &Canvas) -> RgbaImage {
    let mut frame = match &canvas.background {
        Some(background) => {
            let mut pixels = background.pixels.as_ref().clone();
            canvas.filter.apply(&mut pixels);
            let mut frame = RgbaImage::from_pixel(canvas.width, canvas.height, PAPER);
            imageops::overlay(&mut frame, &pixels, 0, 0);
            frame
        }
        None => RgbaImage::from_pixel(canvas.width, canvas.height, PAPER),
    };

    for object in canvas.objects() {
        match &object.kind {
            ObjectKind::Text(text) => draw_text(&mut frame, text),
            ObjectKind::Logo(logo) => draw_logo(&mut frame, logo),
        }
    }
    frame
}

fn draw_logo(frame: &mut RgbaImage, logo: &LogoElement) {
    let mut pixels = logo.image.pixels.as_ref().clone();
    let opacity = logo.opacity.clamp(0.0, 1.0);
    if opacity < 1.0 {
        for pixel in pixels.pixels_mut() {
            pixel.0[3] = (f32::from(pixel.0[3]) * opacity).round() as u8;
        }
    }
    let x = (logo.left - pixels.width() as f32 / 2.0).round() as i64;
    let y = logo.top.round() as i64;
    imageops::overlay(frame, &pixels, x, y);
}

fn draw_text(frame: &mut RgbaImage, text: &TextElement) {
    let style = &text.style;
    let layout = TextLayout::new(style);

    // Negative widths and blur are drawn as zero.
    let outline = style.outline.width.max(0) as u32;
    let blur = style.shadow.blur.max(0) as u32;
    let offset = style.shadow.offset_x.unsigned_abs().max(style.shadow.offset_y.unsigned_abs());
    let pad = outline
        .div_ceil(2)
        .saturating_add(blur.saturating_mul(2))
        .saturating_add(offset);

    let width = layout.width.saturating_add(pad.saturating_mul(2));
    let height = layout.height.saturating_add(pad.saturating_mul(2));
    let limit = frame.width().max(frame.height()).saturating_mul(MAX_LAYER_SCALE);
    if width > limit || height > limit {
        tracing::warn!(width, height, limit, "text layer too large, skipped");
        return;
    }

    let glyphs = layout.coverage(style.align);
    let mut layer = RgbaImage::new(width, height);

    if style.shadow.is_visible() {
        let mut shadow = GrayImage::new(width, height);
        let x = i64::from(pad) + i64::from(style.shadow.offset_x);
        let y = i64::from(pad) + i64::from(style.shadow.offset_y);
        imageops::overlay(&mut shadow, &glyphs, x, y);
        if blur > 0 {
            shadow = imageops::blur(&shadow, blur as f32 / 2.0);
        }
        paint(&mut layer, &shadow, style.shadow.color);
    }

    let mut fill = GrayImage::new(width, height);
    imageops::overlay(&mut fill, &glyphs, i64::from(pad), i64::from(pad));
    if outline > 0 {
        let stroke = dilate(&fill, outline.div_ceil(2));
        paint(&mut layer, &stroke, style.outline.color);
    }
    paint(&mut layer, &fill, style.fill);

    let center_x = text.left;
    let center_y = text.top + layout.height as f32 / 2.0;
    composite_rotated(frame, &layer, center_x, center_y, style.angle as f32);
}

fn paint(layer: &mut RgbaImage, coverage: &GrayImage, color: Color) {
    let [r, g, b] = color.rgb();
    for (x, y, alpha) in coverage.enumerate_pixels() {
        if alpha.0[0] > 0 {
            layer.get_pixel_mut(x, y).blend(&Rgba([r, g, b, alpha.0[0]]));
        }
    }
}

/// Square max filter, applied horizontally then vertically.
fn dilate(mask: &GrayImage, radius: u32) -> GrayImage {
    let (width, height) = mask.dimensions();
    let pass = |source: &GrayImage, horizontal: bool| {
        let mut out = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let (position, limit) = if horizontal { (x, width) } else { (y, height) };
                let start = position.saturating_sub(radius);
                let end = (position + radius).min(limit - 1);
                let value = (start..=end)
                    .map(|i| {
                        let (sx, sy) = if horizontal { (i, y) } else { (x, i) };
                        source.get_pixel(sx, sy).0[0]
                    })
                    .max()
                    .unwrap_or(0);
                out.put_pixel(x, y, Luma([value]));
            }
        }
        out
    };
    pass(&pass(mask, true), false)
}

/// Draws `layer` centered on (center_x, center_y), rotated clockwise by `degrees`.
fn composite_rotated(frame: &mut RgbaImage, layer: &RgbaImage, center_x: f32, center_y: f32, degrees: f32) {
    let (layer_width, layer_height) = (layer.width() as f32, layer.height() as f32);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let half_x = (layer_width * cos.abs() + layer_height * sin.abs()) / 2.0;
    let half_y = (layer_width * sin.abs() + layer_height * cos.abs()) / 2.0;

    let min_x = (center_x - half_x).floor().max(0.0) as u32;
    let min_y = (center_y - half_y).floor().max(0.0) as u32;
    let max_x = ((center_x + half_x).ceil().max(0.0) as u32).min(frame.width());
    let max_y = ((center_y + half_y).ceil().max(0.0) as u32).min(frame.height());

    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f32 + 0.5 - center_x;
            let dy = y as f32 + 0.5 - center_y;
            // Inverse rotation back into layer space.
            let lx = dx * cos + dy * sin + layer_width / 2.0;
            let ly = -dx * sin + dy * cos + layer_height / 2.0;
            if lx < 0.0 || ly < 0.0 || lx >= layer_width || ly >= layer_height {
                continue;
            }
            let source = layer.get_pixel(lx as u32, ly as u32);
            if source.0[3] > 0 {
                frame.get_pixel_mut(x, y).blend(source);
            }
        }
    }
}
