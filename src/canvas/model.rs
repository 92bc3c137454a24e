use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::canvas::filters::ImageFilter;
use crate::canvas::style::TextStyle;
use crate::canvas::text::TextLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// `left` is the horizontal center, `top` the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub left: f32,
    pub top: f32,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    /// Encoded PNG, kept so a saved design embeds exactly what was placed.
    pub png: Arc<Vec<u8>>,
    pub pixels: Arc<RgbaImage>,
}

/// Horizontally centered on `left`, like text.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoElement {
    pub left: f32,
    pub top: f32,
    pub opacity: f32,
    pub image: LogoImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Text(TextElement),
    Logo(LogoElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

impl CanvasObject {
    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.kind {
            ObjectKind::Text(text) => Some(text),
            ObjectKind::Logo(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.as_text().is_some()
    }

    /// Unrotated bounds as (left, top, width, height) plus the rotation in degrees.
    fn bounds(&self) -> ((f32, f32, f32, f32), f32) {
        match &self.kind {
            ObjectKind::Text(text) => {
                let layout = TextLayout::new(&text.style);
                let width = layout.width as f32;
                (
                    (text.left - width / 2.0, text.top, width, layout.height as f32),
                    text.style.angle as f32,
                )
            }
            ObjectKind::Logo(logo) => {
                let width = logo.image.pixels.width() as f32;
                let height = logo.image.pixels.height() as f32;
                ((logo.left - width / 2.0, logo.top, width, height), 0.0)
            }
        }
    }
}

/// The template image, already scaled to the canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub source: String,
    pub pixels: Arc<RgbaImage>,
}

impl Background {
    pub fn decode(source: &str, bytes: &[u8], width: u32, height: u32) -> image::ImageResult<Self> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let scaled = if decoded.dimensions() == (width, height) {
            decoded
        } else {
            imageops::resize(&decoded, width, height, FilterType::Triangle)
        };
        Ok(Self {
            source: source.to_string(),
            pixels: Arc::new(scaled),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Created(ObjectId),
    Updated(ObjectId),
    Cleared,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub background: Option<Background>,
    pub filter: ImageFilter,
    objects: Vec<CanvasObject>,
    next_id: u64,
    selection: Option<ObjectId>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            filter: ImageFilter::None,
            objects: Vec::new(),
            next_id: 1,
            selection: None,
        }
    }

    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    pub fn add(&mut self, kind: ObjectKind) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(CanvasObject { id, kind });
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<CanvasObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        Some(self.objects.remove(index))
    }

    pub fn get(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn text(&self, id: ObjectId) -> Option<&TextElement> {
        self.get(id).and_then(CanvasObject::as_text)
    }

    pub fn text_mut(&mut self, id: ObjectId) -> Option<&mut TextElement> {
        self.objects
            .iter_mut()
            .find(|object| object.id == id)
            .and_then(|object| match &mut object.kind {
                ObjectKind::Text(text) => Some(text),
                ObjectKind::Logo(_) => None,
            })
    }

    pub fn logo_mut(&mut self, id: ObjectId) -> Option<&mut LogoElement> {
        self.objects
            .iter_mut()
            .find(|object| object.id == id)
            .and_then(|object| match &mut object.kind {
                ObjectKind::Logo(logo) => Some(logo),
                ObjectKind::Text(_) => None,
            })
    }

    /// First text element in document order.
    pub fn first_text(&self) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|object| object.is_text())
            .map(|object| object.id)
    }

    pub fn first_logo(&self) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|object| matches!(object.kind, ObjectKind::Logo(_)))
            .map(|object| object.id)
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    /// Unknown ids clear the selection.
    pub fn select(&mut self, id: Option<ObjectId>) -> SelectionEvent {
        let next = id.filter(|id| self.get(*id).is_some());
        let event = match (self.selection, next) {
            (previous, next) if previous == next => SelectionEvent::Unchanged,
            (None, Some(id)) => SelectionEvent::Created(id),
            (Some(_), Some(id)) => SelectionEvent::Updated(id),
            (Some(_), None) => SelectionEvent::Cleared,
            (None, None) => SelectionEvent::Unchanged,
        };
        self.selection = next;
        event
    }

    pub fn translate(&mut self, id: ObjectId, dx: f32, dy: f32) -> bool {
        let Some(object) = self.objects.iter_mut().find(|object| object.id == id) else {
            return false;
        };
        let (left, top) = match &mut object.kind {
            ObjectKind::Text(text) => (&mut text.left, &mut text.top),
            ObjectKind::Logo(logo) => (&mut logo.left, &mut logo.top),
        };
        *left += dx;
        *top += dy;
        true
    }

    /// Topmost object containing the point, honoring text rotation.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ObjectId> {
        self.objects.iter().rev().find_map(|object| {
            let ((left, top, width, height), angle) = object.bounds();
            let cx = left + width / 2.0;
            let cy = top + height / 2.0;
            let (sin, cos) = (-angle).to_radians().sin_cos();
            let dx = x - cx;
            let dy = y - cy;
            let local_x = dx * cos - dy * sin;
            let local_y = dx * sin + dy * cos;
            (local_x.abs() <= width / 2.0 && local_y.abs() <= height / 2.0).then_some(object.id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::style::{Color, Outline, Shadow, TextAlign};

    fn style(content: &str) -> TextStyle {
        TextStyle {
            content: content.to_string(),
            fill: Color::WHITE,
            font_family: "Arial".to_string(),
            font_size: 40,
            align: TextAlign::Center,
            angle: 0,
            outline: Outline {
                width: 0,
                color: Color::BLACK,
            },
            shadow: Shadow::default(),
        }
    }

    fn text_at(left: f32, top: f32, content: &str) -> ObjectKind {
        ObjectKind::Text(TextElement {
            left,
            top,
            style: style(content),
        })
    }

    #[test]
    fn ids_are_unique_and_first_text_follows_document_order() {
        let mut canvas = Canvas::new(400, 400);
        let first = canvas.add(text_at(100.0, 100.0, "one"));
        let second = canvas.add(text_at(200.0, 200.0, "two"));
        assert_ne!(first, second);
        assert_eq!(canvas.first_text(), Some(first));

        canvas.remove(first);
        assert_eq!(canvas.first_text(), Some(second));
    }

    #[test]
    fn selection_reports_created_updated_and_cleared() {
        let mut canvas = Canvas::new(400, 400);
        let a = canvas.add(text_at(100.0, 100.0, "a"));
        let b = canvas.add(text_at(100.0, 300.0, "b"));

        assert_eq!(canvas.select(Some(a)), SelectionEvent::Created(a));
        assert_eq!(canvas.select(Some(a)), SelectionEvent::Unchanged);
        assert_eq!(canvas.select(Some(b)), SelectionEvent::Updated(b));
        assert_eq!(canvas.select(None), SelectionEvent::Cleared);
        assert_eq!(canvas.select(None), SelectionEvent::Unchanged);
    }

    #[test]
    fn removing_the_selected_object_clears_selection() {
        let mut canvas = Canvas::new(400, 400);
        let a = canvas.add(text_at(100.0, 100.0, "a"));
        canvas.select(Some(a));
        canvas.remove(a);
        assert_eq!(canvas.selection(), None);
    }

    #[test]
    fn hit_test_prefers_the_topmost_object() {
        let mut canvas = Canvas::new(400, 400);
        let below = canvas.add(text_at(200.0, 100.0, "wide text"));
        let above = canvas.add(text_at(200.0, 100.0, "x"));

        assert_eq!(canvas.hit_test(200.0, 120.0), Some(above));
        assert_eq!(canvas.hit_test(40.0, 120.0), Some(below));
        assert_eq!(canvas.hit_test(200.0, 390.0), None);
    }

    #[test]
    fn hit_test_follows_rotation() {
        let mut canvas = Canvas::new(400, 400);
        let id = canvas.add(text_at(200.0, 180.0, "abcdefgh"));
        // 320 wide, 40 tall, centered at (200, 200).
        assert_eq!(canvas.hit_test(340.0, 200.0), Some(id));
        assert_eq!(canvas.hit_test(200.0, 330.0), None);

        canvas.text_mut(id).expect("text").style.angle = 90;
        assert_eq!(canvas.hit_test(340.0, 200.0), None);
        assert_eq!(canvas.hit_test(200.0, 330.0), Some(id));
    }

    #[test]
    fn translate_moves_only_position() {
        let mut canvas = Canvas::new(400, 400);
        let id = canvas.add(text_at(100.0, 100.0, "a"));
        assert!(canvas.translate(id, 5.0, -10.0));
        let text = canvas.text(id).expect("text");
        assert_eq!((text.left, text.top), (105.0, 90.0));
        assert_eq!(text.style, style("a"));
    }

    #[test]
    fn background_is_scaled_to_the_canvas() {
        let source = RgbaImage::from_pixel(20, 10, image::Rgba([1, 2, 3, 255]));
        let mut png = Vec::new();
        source
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("png should encode");

        let background = Background::decode("bg.png", &png, 40, 40).expect("decode");
        assert_eq!(background.pixels.dimensions(), (40, 40));
        assert_eq!(background.source, "bg.png");
    }
}
