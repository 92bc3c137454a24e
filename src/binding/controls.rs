use crate::canvas::style::{Color, Outline, Shadow, TextAlign, TextStyle};
use crate::input::ToggleGroup;

/// One edit coming from a control in the style panel.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleInput {
    Content(String),
    Fill(Color),
    FontFamily(String),
    FontSize(u32),
    Align(TextAlign),
    Angle(i32),
    OutlineWidth(i32),
    OutlineColor(Color),
    ShadowColor(Color),
    ShadowBlur(i32),
    ShadowOffsetX(i32),
    ShadowOffsetY(i32),
}

impl StyleInput {
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }
}

/// Current values of the style panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleControls {
    pub content: String,
    pub fill: Color,
    pub font_family: String,
    pub font_size: u32,
    pub align: ToggleGroup<TextAlign>,
    pub angle: i32,
    pub outline_width: i32,
    pub outline_color: Color,
    pub shadow_color: Color,
    pub shadow_blur: i32,
    pub shadow_offset_x: i32,
    pub shadow_offset_y: i32,
}

impl Default for StyleControls {
    fn default() -> Self {
        let mut align = ToggleGroup::new(TextAlign::ALL.to_vec());
        align.mark(&TextAlign::Center);
        Self {
            content: String::new(),
            fill: Color::WHITE,
            font_family: "Arial".to_string(),
            font_size: 40,
            align,
            angle: 0,
            outline_width: 0,
            outline_color: Color::BLACK,
            shadow_color: Color::BLACK,
            shadow_blur: 0,
            shadow_offset_x: 0,
            shadow_offset_y: 0,
        }
    }
}

impl StyleControls {
    pub fn alignment(&self) -> TextAlign {
        self.align.active().copied().unwrap_or(TextAlign::Center)
    }

    /// The composite shadow built from its four controls.
    pub fn shadow(&self) -> Shadow {
        Shadow {
            color: self.shadow_color,
            blur: self.shadow_blur,
            offset_x: self.shadow_offset_x,
            offset_y: self.shadow_offset_y,
        }
    }

    pub fn snapshot(&self) -> TextStyle {
        TextStyle {
            content: self.content.clone(),
            fill: self.fill,
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            align: self.alignment(),
            angle: self.angle,
            outline: Outline {
                width: self.outline_width,
                color: self.outline_color,
            },
            shadow: self.shadow(),
        }
    }

    pub fn write(&mut self, input: &StyleInput) {
        match input {
            StyleInput::Content(content) => self.content = content.clone(),
            StyleInput::Fill(color) => self.fill = *color,
            StyleInput::FontFamily(family) => self.font_family = family.clone(),
            StyleInput::FontSize(size) => self.font_size = *size,
            StyleInput::Align(align) => {
                self.align.mark(align);
            }
            StyleInput::Angle(angle) => self.angle = *angle,
            StyleInput::OutlineWidth(width) => self.outline_width = *width,
            StyleInput::OutlineColor(color) => self.outline_color = *color,
            StyleInput::ShadowColor(color) => self.shadow_color = *color,
            StyleInput::ShadowBlur(blur) => self.shadow_blur = *blur,
            StyleInput::ShadowOffsetX(offset) => self.shadow_offset_x = *offset,
            StyleInput::ShadowOffsetY(offset) => self.shadow_offset_y = *offset,
        }
    }

    /// Overwrites every control from an element's style.
    pub fn push(&mut self, style: &TextStyle) {
        self.content = style.content.clone();
        self.fill = style.fill;
        self.font_family = style.font_family.clone();
        self.font_size = style.font_size;
        self.align.mark(&style.align);
        self.angle = style.angle;
        self.outline_width = style.outline.width;
        self.outline_color = style.outline.color;
        self.shadow_color = style.shadow.color;
        self.shadow_blur = style.shadow.blur;
        self.shadow_offset_x = style.shadow.offset_x;
        self.shadow_offset_y = style.shadow.offset_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_written_inputs() {
        let mut controls = StyleControls::default();
        controls.write(&StyleInput::FontSize(72));
        controls.write(&StyleInput::Align(TextAlign::Right));
        controls.write(&StyleInput::ShadowOffsetY(4));

        let style = controls.snapshot();
        assert_eq!(style.font_size, 72);
        assert_eq!(style.align, TextAlign::Right);
        assert_eq!(style.shadow.offset_y, 4);
        assert!(controls.align.is_active(&TextAlign::Right));
    }

    #[test]
    fn push_then_snapshot_is_identity() {
        let mut source = StyleControls::default();
        source.write(&StyleInput::Content("Acme".to_string()));
        source.write(&StyleInput::Fill(Color([255, 0, 0])));
        source.write(&StyleInput::Angle(-30));
        source.write(&StyleInput::ShadowColor(Color([1, 1, 1])));
        let style = source.snapshot();

        let mut controls = StyleControls::default();
        controls.push(&style);
        assert_eq!(controls.snapshot(), style);
    }

    #[test]
    fn only_the_content_input_is_content() {
        assert!(StyleInput::Content(String::new()).is_content());
        assert!(!StyleInput::ShadowBlur(2).is_content());
    }
}
