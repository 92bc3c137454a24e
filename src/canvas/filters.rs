use image::RgbaImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
}

impl ImageFilter {
    pub const ALL: [ImageFilter; 4] = [
        ImageFilter::None,
        ImageFilter::Grayscale,
        ImageFilter::Sepia,
        ImageFilter::Invert,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Grayscale => "Grayscale",
            Self::Sepia => "Sepia",
            Self::Invert => "Invert",
        }
    }

    /// Rewrites color channels in place; alpha is untouched.
    pub fn apply(self, image: &mut RgbaImage) {
        match self {
            Self::None => {}
            Self::Grayscale => {
                for pixel in image.pixels_mut() {
                    let [r, g, b, _] = pixel.0;
                    let average = ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8;
                    pixel.0[..3].copy_from_slice(&[average; 3]);
                }
            }
            Self::Sepia => {
                for pixel in image.pixels_mut() {
                    let [r, g, b, _] = pixel.0.map(f32::from);
                    pixel.0[0] = channel(0.393 * r + 0.769 * g + 0.189 * b);
                    pixel.0[1] = channel(0.349 * r + 0.686 * g + 0.168 * b);
                    pixel.0[2] = channel(0.272 * r + 0.534 * g + 0.131 * b);
                }
            }
            Self::Invert => {
                for pixel in image.pixels_mut() {
                    for value in &mut pixel.0[..3] {
                        *value = 255 - *value;
                    }
                }
            }
        }
    }
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
