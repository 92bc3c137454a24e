use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::error::AppError;
use crate::app::events::AppEvent;
use crate::app::state::{AppState, StatusKind, StatusMessage};
use crate::binding::StyleInput;
use crate::canvas::logo::prepare_logo;
use crate::canvas::model::Background;
use crate::canvas::{
    export_image, load_design, save_design, ImageFilter, LogoElement, ObjectId, ObjectKind,
    SelectionEvent,
};
use crate::catalog::{
    derive_categories, filter_templates, load_catalog, CatalogLoadError, Gallery,
    TemplateDescriptor,
};
use crate::input::{Activation, ToggleGroup};
use crate::infra::config::AppConfig;
use crate::infra::fetch::AssetFetcher;

pub const STARTUP_TEXT: &str = "Your Company Name";
pub const NEW_TEXT: &str = "New Text";
const LOGO_TOP: f32 = 100.0;

pub struct ApplicationController {
    config: AppConfig,
    state: AppState,
    fetcher: Arc<dyn AssetFetcher>,
}

impl ApplicationController {
    pub fn new(config: AppConfig, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            state: AppState::new(&config),
            config,
            fetcher,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn fetcher(&self) -> Arc<dyn AssetFetcher> {
        Arc::clone(&self.fetcher)
    }

    /// Puts the editor in its starting state: one text element holding the company name.
    pub fn bootstrap(&mut self) {
        let state = &mut self.state;
        state.binding.create_text_element(&mut state.canvas, STARTUP_TEXT);
        self.touch();
        tracing::info!(
            width = self.config.canvas_width,
            height = self.config.canvas_height,
            "editor initialized"
        );
    }

    /// Blocking manifest load for callers without an event loop.
    pub fn load_catalog_now(&mut self) {
        let result = load_catalog(
            self.fetcher.as_ref(),
            &self.config.manifest_source,
            &self.config.asset_root,
        );
        self.dispatch(AppEvent::CatalogLoaded(result));
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogLoaded(result) => self.on_catalog_loaded(result),
            AppEvent::ChooseCategory {
                category,
                activation,
            } => self.choose_category(&category, activation),
            AppEvent::SearchChanged(term) => {
                self.state.catalog.view.search_term = term;
                self.refresh_gallery();
            }
            AppEvent::ActivateTemplate { index, activation } => {
                self.activate_template(index, activation)
            }
            AppEvent::Style(input) => self.apply_style(input),
            AppEvent::AlignActivated { align, activation } => {
                if activation.triggers() {
                    self.apply_style(StyleInput::Align(align));
                }
            }
            AppEvent::SwatchActivated { color, activation } => {
                if activation.triggers() {
                    self.apply_style(StyleInput::Fill(color));
                }
            }
            AppEvent::AddText => {
                let state = &mut self.state;
                state.binding.create_text_element(&mut state.canvas, NEW_TEXT);
                self.touch();
            }
            AppEvent::SelectAt { x, y } => {
                let hit = self.state.canvas.hit_test(x, y);
                self.select(hit);
            }
            AppEvent::SelectionChanged(selection) => self.select(selection),
            AppEvent::DragSelection { dx, dy } => {
                if let Some(id) = self.state.canvas.selection() {
                    if self.state.canvas.translate(id, dx, dy) {
                        self.touch();
                    }
                }
            }
            AppEvent::LogoFile(path) => {
                let result = fs::read(&path)
                    .map_err(|error| AppError::Io {
                        path: path.display().to_string(),
                        error,
                    })
                    .and_then(|bytes| self.place_logo(&bytes).map(|_| ()));
                self.report(result, "logo import failed");
            }
            AppEvent::LogoReceived(bytes) => {
                let result = self.place_logo(&bytes).map(|_| ());
                self.report(result, "logo import failed");
            }
            AppEvent::LogoOpacity(opacity) => self.set_logo_opacity(opacity),
            AppEvent::FilterActivated { filter, activation } => {
                self.apply_filter(filter, activation)
            }
            AppEvent::SetExportFormat(format) => self.state.export_format = format,
            AppEvent::SaveDesign(path) => {
                let result = self.save_design_to(&path);
                self.report(result, "design save failed");
            }
            AppEvent::LoadDesign(path) => {
                let result = self.load_design_from(&path);
                self.report(result, "design load failed");
            }
            AppEvent::Export { dir } => {
                let result = self.export_to(&dir).map(|_| ());
                self.report(result, "export failed");
            }
            AppEvent::DismissStatus => self.state.status = None,
        }
    }

    /// Fires the lazy thumbnail of a gallery item that just became visible.
    pub fn reveal_thumbnail(&mut self, index: usize) -> Option<String> {
        self.state.catalog.gallery.reveal(index)
    }

    pub fn templates(&self) -> &[TemplateDescriptor] {
        &self.state.catalog.templates
    }

    fn on_catalog_loaded(&mut self, result: Result<Vec<TemplateDescriptor>, CatalogLoadError>) {
        let catalog = &mut self.state.catalog;
        catalog.loaded = true;
        match result {
            Ok(templates) => {
                catalog.categories = ToggleGroup::new(derive_categories(&templates));
                catalog.templates = templates;
            }
            Err(error) => {
                tracing::error!(%error, source = %self.config.manifest_source, "template catalog unavailable");
                catalog.templates.clear();
                self.set_status(StatusKind::Error, format!("templates could not be loaded: {error}"));
            }
        }
        self.refresh_gallery();
    }

    fn choose_category(&mut self, category: &str, activation: Activation) {
        let catalog = &mut self.state.catalog;
        let Some(active) = catalog.categories.activate(&category.to_string(), activation) else {
            return;
        };
        catalog.view.active_category = active.clone();
        self.refresh_gallery();
    }

    /// Recomputes the filtered list from scratch and re-renders the gallery.
    fn refresh_gallery(&mut self) {
        let catalog = &mut self.state.catalog;
        let filtered = filter_templates(
            &catalog.templates,
            &catalog.view.active_category,
            &catalog.view.search_term,
        );
        catalog.gallery = Gallery::render(filtered, catalog.selected_path.as_deref());
    }

    fn activate_template(&mut self, index: usize, activation: Activation) {
        let Some(path) = self.state.catalog.gallery.activate(index, activation) else {
            return;
        };
        self.state.catalog.selected_path = Some(path.clone());
        let result = self.select_template(&path);
        self.report(result, "template could not be loaded");
    }

    /// Loads a template as the background. The current filter stays in place.
    pub fn select_template(&mut self, path: &str) -> Result<(), AppError> {
        let bytes = self.fetcher.fetch(path)?;
        let canvas = &mut self.state.canvas;
        let background = Background::decode(path, &bytes, canvas.width, canvas.height)?;
        canvas.background = Some(background);
        tracing::info!(path, filter = canvas.filter.label(), "template applied");
        self.touch();
        Ok(())
    }

    fn apply_style(&mut self, input: StyleInput) {
        let state = &mut self.state;
        if state
            .binding
            .on_style_input_changed(&mut state.canvas, input)
            .needs_render()
        {
            self.touch();
        }
    }

    /// Re-selecting the current object is a no-op; the controls already mirror it.
    fn select(&mut self, selection: Option<ObjectId>) {
        let state = &mut self.state;
        let event = state.canvas.select(selection);
        if event == SelectionEvent::Unchanged {
            return;
        }
        tracing::debug!(?event, "selection changed");
        let current = state.canvas.selection();
        state.binding.on_selection_changed(&state.canvas, current);
        self.touch();
    }

    /// Resizes the logo to fit the configured bound and places it, replacing any previous one.
    pub fn place_logo(&mut self, bytes: &[u8]) -> Result<ObjectId, AppError> {
        let image = prepare_logo(bytes, self.config.logo_max_width, self.config.logo_max_height)?;
        let state = &mut self.state;
        if let Some(previous) = state.logo.take() {
            state.canvas.remove(previous);
            state
                .binding
                .on_selection_changed(&state.canvas, state.canvas.selection());
        }
        let (width, height) = image.pixels.dimensions();
        let left = state.canvas.width as f32 / 2.0;
        let id = state.canvas.add(ObjectKind::Logo(LogoElement {
            left,
            top: LOGO_TOP,
            opacity: state.logo_opacity,
            image,
        }));
        state.logo = Some(id);
        tracing::info!(width, height, "logo placed");
        self.touch();
        Ok(id)
    }

    fn set_logo_opacity(&mut self, opacity: f32) {
        self.state.logo_opacity = opacity;
        let Some(id) = self.state.logo else {
            return;
        };
        if let Some(logo) = self.state.canvas.logo_mut(id) {
            logo.opacity = opacity;
            self.touch();
        }
    }

    fn apply_filter(&mut self, filter: ImageFilter, activation: Activation) {
        if self.state.filters.activate(&filter, activation).is_none() {
            return;
        }
        self.state.canvas.filter = filter;
        tracing::debug!(filter = filter.label(), "filter applied");
        self.touch();
    }

    pub fn save_design_to(&mut self, path: &Path) -> Result<(), AppError> {
        let json = save_design(&self.state.canvas)?;
        fs::write(path, json).map_err(|error| AppError::Io {
            path: path.display().to_string(),
            error,
        })?;
        tracing::info!(path = %path.display(), "design saved");
        self.set_status(StatusKind::Info, format!("design saved to {}", path.display()));
        Ok(())
    }

    pub fn load_design_from(&mut self, path: &Path) -> Result<(), AppError> {
        let json = fs::read_to_string(path).map_err(|error| AppError::Io {
            path: path.display().to_string(),
            error,
        })?;
        self.load_design_json(&json)?;
        tracing::info!(path = %path.display(), "design loaded");
        self.set_status(StatusKind::Info, format!("design loaded from {}", path.display()));
        Ok(())
    }

    /// Replaces the canvas with the decoded design and rebuilds everything derived from it.
    pub fn load_design_json(&mut self, json: &str) -> Result<(), AppError> {
        let canvas = load_design(json, self.fetcher.as_ref())?;
        let state = &mut self.state;
        state.canvas = canvas;
        state.logo = state.canvas.first_logo();
        if let Some(opacity) = state
            .logo
            .and_then(|id| state.canvas.logo_mut(id))
            .map(|logo| logo.opacity)
        {
            state.logo_opacity = opacity;
        }
        state.filters.mark(&state.canvas.filter);
        state.catalog.selected_path = state
            .canvas
            .background
            .as_ref()
            .map(|background| background.source.clone());
        state.binding.on_design_loaded(&mut state.canvas);
        self.refresh_gallery();
        self.touch();
        Ok(())
    }

    pub fn export_to(&mut self, dir: &Path) -> Result<PathBuf, AppError> {
        let path = export_image(&self.state.canvas, self.state.export_format, dir)?;
        self.set_status(StatusKind::Info, format!("exported {}", path.display()));
        Ok(path)
    }

    fn report(&mut self, result: Result<(), AppError>, context: &str) {
        if let Err(error) = result {
            tracing::error!(%error, "{context}");
            self.set_status(StatusKind::Error, format!("{context}: {error}"));
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: String) {
        self.state.status = Some(StatusMessage { kind, text });
    }

    fn touch(&mut self) {
        self.state.revision += 1;
    }
}
