//! Two-way binding between the style controls and the single active text element.
//!
//! The canvas owns the elements; the binding only remembers which one is active and
//! reads or writes its [`TextStyle`](crate::canvas::TextStyle).

mod controls;

pub use controls::{StyleControls, StyleInput};

use crate::canvas::{Canvas, ObjectId, ObjectKind, TextElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOutcome {
    Applied(ObjectId),
    Created(ObjectId),
    Ignored,
}

impl BindingOutcome {
    pub fn needs_render(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextBinding {
    pub controls: StyleControls,
    active: Option<ObjectId>,
}

impl TextBinding {
    pub fn new(controls: StyleControls) -> Self {
        Self {
            controls,
            active: None,
        }
    }

    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    /// Places a new element at the canvas-center default position, styled from the
    /// current controls, and makes it the active, selected element.
    pub fn create_text_element(&mut self, canvas: &mut Canvas, content: &str) -> ObjectId {
        let mut style = self.controls.snapshot();
        style.content = content.to_string();
        let (left, top) = (canvas.width as f32 / 2.0, canvas.height as f32 / 2.0);
        let id = canvas.add(ObjectKind::Text(TextElement { left, top, style }));
        canvas.select(Some(id));
        self.on_selection_changed(canvas, Some(id));
        tracing::debug!(id = id.get(), content, "text element created");
        id
    }

    /// Records the control value, then applies just that attribute to the active element.
    /// With nothing active a content edit creates a new element; other edits do nothing.
    pub fn on_style_input_changed(&mut self, canvas: &mut Canvas, input: StyleInput) -> BindingOutcome {
        self.controls.write(&input);

        let active = self.active.filter(|id| canvas.text(*id).is_some());
        if active.is_none() {
            self.active = None;
        }

        let Some(id) = active else {
            if input.is_content() {
                let content = self.controls.content.clone();
                return BindingOutcome::Created(self.create_text_element(canvas, &content));
            }
            return BindingOutcome::Ignored;
        };

        let shadow = self.controls.shadow();
        let Some(text) = canvas.text_mut(id) else {
            return BindingOutcome::Ignored;
        };
        let style = &mut text.style;
        match input {
            StyleInput::Content(content) => style.content = content,
            StyleInput::Fill(color) => style.fill = color,
            StyleInput::FontFamily(family) => style.font_family = family,
            StyleInput::FontSize(size) => style.font_size = size,
            StyleInput::Align(align) => style.align = align,
            StyleInput::Angle(angle) => style.angle = angle,
            StyleInput::OutlineWidth(width) => style.outline.width = width,
            StyleInput::OutlineColor(color) => style.outline.color = color,
            StyleInput::ShadowColor(_)
            | StyleInput::ShadowBlur(_)
            | StyleInput::ShadowOffsetX(_)
            | StyleInput::ShadowOffsetY(_) => style.shadow = shadow,
        }
        BindingOutcome::Applied(id)
    }

    /// A newly selected text element pushes all of its attributes into the controls.
    /// Anything else drops the active reference and empties only the content control.
    pub fn on_selection_changed(&mut self, canvas: &Canvas, selection: Option<ObjectId>) {
        match selection.and_then(|id| canvas.text(id).map(|text| (id, text))) {
            Some((id, text)) => {
                self.active = Some(id);
                self.controls.push(&text.style);
            }
            None => {
                self.active = None;
                self.controls.content.clear();
            }
        }
    }

    /// After a design load the first text element in document order becomes active.
    pub fn on_design_loaded(&mut self, canvas: &mut Canvas) {
        let first = canvas.first_text();
        canvas.select(first);
        self.on_selection_changed(canvas, first);
    }
}
