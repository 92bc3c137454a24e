use crate::binding::{StyleControls, TextBinding};
use crate::canvas::{Canvas, ExportFormat, ImageFilter, ObjectId};
use crate::catalog::{CatalogViewState, Gallery, TemplateDescriptor, ALL_CATEGORIES};
use crate::input::ToggleGroup;
use crate::infra::config::AppConfig;

#[derive(Debug, Clone)]
pub struct CatalogState {
    pub templates: Vec<TemplateDescriptor>,
    pub categories: ToggleGroup<String>,
    pub view: CatalogViewState,
    pub gallery: Gallery,
    /// Path of the template currently used as background.
    pub selected_path: Option<String>,
    pub loaded: bool,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            categories: ToggleGroup::new(vec![ALL_CATEGORIES.to_string()]),
            view: CatalogViewState::default(),
            gallery: Gallery::default(),
            selected_path: None,
            loaded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: CatalogState,
    pub canvas: Canvas,
    pub binding: TextBinding,
    pub filters: ToggleGroup<ImageFilter>,
    pub logo: Option<ObjectId>,
    pub logo_opacity: f32,
    pub export_format: ExportFormat,
    pub status: Option<StatusMessage>,
    /// Bumped on every canvas change so the preview knows when to re-render.
    pub revision: u64,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let mut controls = StyleControls::default();
        if let Some(family) = config.font_families.first() {
            controls.font_family = family.clone();
        }
        Self {
            catalog: CatalogState::default(),
            canvas: Canvas::new(config.canvas_width, config.canvas_height),
            binding: TextBinding::new(controls),
            filters: ToggleGroup::new(ImageFilter::ALL.to_vec()),
            logo: None,
            logo_opacity: 1.0,
            export_format: ExportFormat::default(),
            status: None,
            revision: 0,
        }
    }
}
