use font8x8::UnicodeFonts;
use image::{GrayImage, Luma};

use crate::canvas::style::{TextAlign, TextStyle};

const GLYPH_SIZE: u32 = 8;
/// Font sizes above this are laid out at this size.
pub const MAX_CELL: u32 = 2048;

/// Block layout of a text element: every glyph occupies a `font_size` square cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub cell: u32,
    pub width: u32,
    pub height: u32,
}

impl TextLayout {
    pub fn new(style: &TextStyle) -> Self {
        let cell = style.font_size.clamp(1, MAX_CELL);
        let lines: Vec<String> = style.content.split('\n').map(str::to_string).collect();
        let columns = lines
            .iter()
            .map(|line| line.chars().count() as u32)
            .max()
            .unwrap_or(0)
            .max(1);
        Self {
            width: columns.saturating_mul(cell),
            height: (lines.len() as u32).saturating_mul(cell),
            lines,
            cell,
        }
    }

    fn line_offset(&self, line: &str, align: TextAlign) -> u32 {
        let line_width = line.chars().count() as u32 * self.cell;
        let free = self.width.saturating_sub(line_width);
        match align {
            TextAlign::Left => 0,
            TextAlign::Center => free / 2,
            TextAlign::Right => free,
        }
    }

    /// Coverage mask of the glyphs, 255 where ink is.
    pub fn coverage(&self, align: TextAlign) -> GrayImage {
        let mut mask = GrayImage::new(self.width, self.height);
        for (row, line) in self.lines.iter().enumerate() {
            let origin_x = self.line_offset(line, align);
            let origin_y = row as u32 * self.cell;
            for (column, ch) in line.chars().enumerate() {
                let Some(glyph) = glyph_for(ch) else {
                    continue;
                };
                let cell_x = origin_x + column as u32 * self.cell;
                for py in 0..self.cell {
                    let bits = glyph[(py * GLYPH_SIZE / self.cell) as usize];
                    for px in 0..self.cell {
                        if (bits >> (px * GLYPH_SIZE / self.cell)) & 1 == 1 {
                            mask.put_pixel(cell_x + px, origin_y + py, Luma([255]));
                        }
                    }
                }
            }
        }
        mask
    }
}

fn glyph_for(ch: char) -> Option<[u8; 8]> {
    font8x8::BASIC_FONTS
        .get(ch)
        .or_else(|| font8x8::LATIN_FONTS.get(ch))
}
