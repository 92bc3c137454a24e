use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ColorParseError(pub String);

/// An opaque sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(ColorParseError(value.to_string())),
        };
        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(value.to_string()));
        }
        let parsed =
            u32::from_str_radix(&expanded, 16).map_err(|_| ColorParseError(value.to_string()))?;
        Ok(Self([
            ((parsed >> 16) & 0xff) as u8,
            ((parsed >> 8) & 0xff) as u8,
            (parsed & 0xff) as u8,
        ]))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub const ALL: [TextAlign; 3] = [TextAlign::Left, TextAlign::Center, TextAlign::Right];

    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Center => "Center",
            Self::Right => "Right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub width: i32,
    pub color: Color,
}

/// Replaced as one unit whenever any of its inputs change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    pub blur: i32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Shadow {
    pub fn is_visible(&self) -> bool {
        self.blur > 0 || self.offset_x != 0 || self.offset_y != 0
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            blur: 0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    pub content: String,
    pub fill: Color,
    pub font_family: String,
    pub font_size: u32,
    pub align: TextAlign,
    /// Rotation in degrees, clockwise.
    pub angle: i32,
    pub outline: Outline,
    pub shadow: Shadow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_parse_and_print_as_hex() {
        let color: Color = "#FF8000".parse().expect("color should parse");
        assert_eq!(color, Color([255, 128, 0]));
        assert_eq!(color.to_string(), "#ff8000");
        assert_eq!("#fff".parse::<Color>(), Ok(Color::WHITE));
        assert!("orange".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn signed_hex_is_not_a_color() {
        assert!("#+12345".parse::<Color>().is_err());
        assert!("#+12".parse::<Color>().is_err());
        assert!("#-1".parse::<Color>().is_err());
    }

    #[test]
    fn style_serializes_colors_as_strings() {
        let outline = Outline {
            width: 2,
            color: Color([0, 0, 255]),
        };
        let json = serde_json::to_value(outline).expect("outline should serialize");
        assert_eq!(json["color"], "#0000ff");
        let back: Outline = serde_json::from_value(json).expect("outline should deserialize");
        assert_eq!(back, outline);
    }

    #[test]
    fn shadow_without_offset_or_blur_is_invisible() {
        assert!(!Shadow::default().is_visible());
        assert!(Shadow {
            offset_x: 3,
            ..Shadow::default()
        }
        .is_visible());
    }
}
