use std::iter::FusedIterator;

use crate::catalog::models::TemplateDescriptor;
use crate::input::Activation;

/// One-shot thumbnail producer: yields its source the first time the item becomes
/// visible and is exhausted afterwards. It never restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyThumbnail {
    source: Option<String>,
}

impl LazyThumbnail {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
        }
    }

    pub fn on_visible(&mut self) -> Option<String> {
        self.source.take()
    }

    pub fn is_consumed(&self) -> bool {
        self.source.is_none()
    }
}

impl Iterator for LazyThumbnail {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.on_visible()
    }
}

impl FusedIterator for LazyThumbnail {}

#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub descriptor: TemplateDescriptor,
    pub thumbnail: LazyThumbnail,
    pub selected: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    items: Vec<GalleryItem>,
}

impl Gallery {
    /// Builds the gallery from a filtered list. Each item gets a fresh lazy producer; the
    /// item whose path equals `selected_path` stays marked.
    pub fn render(filtered: Vec<TemplateDescriptor>, selected_path: Option<&str>) -> Self {
        let items = filtered
            .into_iter()
            .map(|descriptor| GalleryItem {
                thumbnail: LazyThumbnail::new(descriptor.thumbnail.clone()),
                selected: selected_path == Some(descriptor.path.as_str()),
                descriptor,
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.selected)
    }

    /// Fires the item's thumbnail producer. `None` once it has been consumed.
    pub fn reveal(&mut self, index: usize) -> Option<String> {
        self.items.get_mut(index)?.thumbnail.on_visible()
    }

    /// Pointer click or Enter/Space on an item. Clears the previous marking, marks the
    /// item and returns the template path to load, exactly once per activation.
    pub fn activate(&mut self, index: usize, activation: Activation) -> Option<String> {
        if !activation.triggers() || index >= self.items.len() {
            return None;
        }
        for item in &mut self.items {
            item.selected = false;
        }
        let item = &mut self.items[index];
        item.selected = true;
        Some(item.descriptor.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ActivationKey;

    fn descriptor(name: &str) -> TemplateDescriptor {
        TemplateDescriptor {
            name: name.to_string(),
            category: "diwali".to_string(),
            thumbnail: format!("thumbs/{name}.jpg"),
            path: format!("templates/{name}.jpg"),
        }
    }

    fn gallery() -> Gallery {
        Gallery::render(vec![descriptor("a"), descriptor("b"), descriptor("c")], None)
    }

    #[test]
    fn lazy_thumbnail_fires_once() {
        let mut thumb = LazyThumbnail::new("thumbs/a.jpg");
        assert_eq!(thumb.next(), Some("thumbs/a.jpg".to_string()));
        assert!(thumb.is_consumed());
        assert_eq!(thumb.next(), None);
        assert_eq!(thumb.on_visible(), None);
    }

    #[test]
    fn rerendering_creates_fresh_producers() {
        let mut first = gallery();
        assert!(first.reveal(0).is_some());
        assert!(first.reveal(0).is_none());

        let filtered = first.items().iter().map(|i| i.descriptor.clone()).collect();
        let mut second = Gallery::render(filtered, None);
        assert_eq!(second.reveal(0), Some("thumbs/a.jpg".to_string()));
    }

    #[test]
    fn selecting_b_after_a_leaves_only_b_marked() {
        let mut gallery = gallery();
        assert_eq!(gallery.activate(0, Activation::Pointer), Some("templates/a.jpg".to_string()));
        assert_eq!(gallery.activate(1, Activation::Pointer), Some("templates/b.jpg".to_string()));
        gallery.activate(1, Activation::Key(ActivationKey::Enter));

        let marked: Vec<_> = gallery
            .items()
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.descriptor.name.as_str())
            .collect();
        assert_eq!(marked, vec!["b"]);
    }

    #[test]
    fn keyboard_and_pointer_select_the_same_path() {
        let mut by_pointer = gallery();
        let mut by_key = gallery();
        assert_eq!(
            by_pointer.activate(2, Activation::Pointer),
            by_key.activate(2, Activation::Key(ActivationKey::Space))
        );
        assert!(by_key.activate(0, Activation::Key(ActivationKey::Other)).is_none());
        assert_eq!(by_key.selected().map(|i| i.descriptor.name.as_str()), Some("c"));
    }

    #[test]
    fn selection_survives_rerender_when_present() {
        let kept = Gallery::render(vec![descriptor("a"), descriptor("b")], Some("templates/b.jpg"));
        assert_eq!(kept.selected().map(|i| i.descriptor.name.as_str()), Some("b"));

        let dropped = Gallery::render(vec![descriptor("a")], Some("templates/b.jpg"));
        assert!(dropped.selected().is_none());
    }
}
