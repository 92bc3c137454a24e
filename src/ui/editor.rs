use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use eframe::egui;

use crate::app::controller::ApplicationController;
use crate::app::events::AppEvent;
use crate::app::state::{AppState, StatusKind};
use crate::binding::StyleInput;
use crate::cache::thumbs::{ThumbnailLoader, ThumbnailOutcome};
use crate::canvas::render::render;
use crate::canvas::{Color, ExportFormat, ImageFilter, TextAlign, DESIGN_FILE_NAME};
use crate::catalog::{category_label, spawn_catalog_load, CatalogLoadError, TemplateDescriptor};
use crate::infra::config::AppConfig;
use crate::input::{Activation, ActivationKey};

type CatalogReceiver = mpsc::Receiver<Result<Vec<TemplateDescriptor>, CatalogLoadError>>;

const THUMBNAIL_WIDTH: f32 = 132.0;
const SWATCH_SIZE: f32 = 22.0;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct EditorApp {
    controller: ApplicationController,
    catalog_rx: Option<CatalogReceiver>,
    thumbnails: ThumbnailLoader,
    thumbnail_textures: HashMap<String, egui::TextureHandle>,
    preview: Option<egui::TextureHandle>,
    preview_revision: Option<u64>,
    palette: Vec<Color>,
}

impl EditorApp {
    pub fn new(controller: ApplicationController) -> Self {
        let config = controller.config();
        let catalog_rx = spawn_catalog_load(
            controller.fetcher(),
            config.manifest_source.clone(),
            config.asset_root.clone(),
        );
        let palette = config
            .palette
            .iter()
            .filter_map(|hex| hex.parse().ok())
            .collect();
        Self {
            thumbnails: ThumbnailLoader::new(controller.fetcher()),
            controller,
            catalog_rx: Some(catalog_rx),
            thumbnail_textures: HashMap::new(),
            preview: None,
            preview_revision: None,
            palette,
        }
    }

    fn poll_background_work(&mut self, ctx: &egui::Context) {
        if let Some(receiver) = &self.catalog_rx {
            match receiver.try_recv() {
                Ok(result) => {
                    self.controller.dispatch(AppEvent::CatalogLoaded(result));
                    self.catalog_rx = None;
                }
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => self.catalog_rx = None,
            }
        }

        for outcome in self.thumbnails.drain() {
            if let ThumbnailOutcome::Ready { source, image } = outcome {
                let size = [image.width() as usize, image.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
                let texture = ctx.load_texture(
                    format!("thumb:{source}"),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                self.thumbnail_textures.insert(source, texture);
            }
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let state = self.controller.state();
        if self.preview.is_some() && self.preview_revision == Some(state.revision) {
            return;
        }
        let frame = render(&state.canvas);
        let size = [frame.width() as usize, frame.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
        match &mut self.preview {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview = Some(ctx.load_texture(
                    "canvas-preview",
                    image,
                    egui::TextureOptions::LINEAR,
                ))
            }
        }
        self.preview_revision = Some(state.revision);
    }

    fn is_waiting(&self) -> bool {
        self.catalog_rx.is_some() || self.thumbnails.is_busy()
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background_work(ctx);
        self.refresh_preview(ctx);

        let mut events = dropped_logo_events(ctx);
        let mut visible = Vec::new();
        {
            let state = self.controller.state();
            let config = self.controller.config();

            egui::SidePanel::left("controls")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        templates_section(ui, state, &self.thumbnail_textures, &mut events, &mut visible);
                        ui.separator();
                        text_section(ui, state, config, &self.palette, &mut events);
                        ui.separator();
                        logo_section(ui, state, &mut events);
                        ui.separator();
                        filter_section(ui, state, &mut events);
                        ui.separator();
                        output_section(ui, state, config, &mut events);
                    });
                });

            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                status_bar(ui, state, &mut events);
            });

            egui::CentralPanel::default().show(ctx, |ui| {
                if let Some(texture) = &self.preview {
                    canvas_view(ui, state, texture, &mut events);
                }
            });
        }

        for index in visible {
            if let Some(source) = self.controller.reveal_thumbnail(index) {
                if !self.thumbnail_textures.contains_key(&source) {
                    self.thumbnails.request(source);
                }
            }
        }
        for event in events {
            self.controller.dispatch(event);
        }
        if self.is_waiting() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}

/// Maps a clicked response to how it was triggered. egui reports Enter and Space on a
/// focused widget as a click, so the pressed key tells the two apart.
fn activation(ui: &egui::Ui, response: &egui::Response) -> Option<Activation> {
    if !response.clicked() {
        return None;
    }
    if response.has_focus() {
        if ui.input(|input| input.key_pressed(egui::Key::Enter)) {
            return Some(Activation::Key(ActivationKey::Enter));
        }
        if ui.input(|input| input.key_pressed(egui::Key::Space)) {
            return Some(Activation::Key(ActivationKey::Space));
        }
    }
    Some(Activation::Pointer)
}

fn swatch(color: Color) -> egui::Color32 {
    let [r, g, b] = color.rgb();
    egui::Color32::from_rgb(r, g, b)
}

fn dropped_logo_events(ctx: &egui::Context) -> Vec<AppEvent> {
    ctx.input(|input| input.raw.dropped_files.clone())
        .into_iter()
        .filter_map(|file| match (file.bytes, file.path) {
            (Some(bytes), _) => Some(AppEvent::LogoReceived(bytes.to_vec())),
            (None, Some(path)) => Some(AppEvent::LogoFile(path)),
            (None, None) => None,
        })
        .collect()
}

fn templates_section(
    ui: &mut egui::Ui,
    state: &AppState,
    textures: &HashMap<String, egui::TextureHandle>,
    events: &mut Vec<AppEvent>,
    visible: &mut Vec<usize>,
) {
    let catalog = &state.catalog;
    ui.heading("Templates");

    ui.horizontal_wrapped(|ui| {
        for category in catalog.categories.options() {
            let response =
                ui.selectable_label(catalog.categories.is_active(category), category_label(category));
            if let Some(activation) = activation(ui, &response) {
                events.push(AppEvent::ChooseCategory {
                    category: category.clone(),
                    activation,
                });
            }
        }
    });

    let mut search = catalog.view.search_term.clone();
    let response = ui.add(egui::TextEdit::singleline(&mut search).hint_text("Search templates"));
    if response.changed() {
        events.push(AppEvent::SearchChanged(search));
    }

    if !catalog.loaded {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading templates");
        });
        return;
    }
    if catalog.gallery.is_empty() {
        ui.label("No templates match.");
        return;
    }

    ui.horizontal_wrapped(|ui| {
        for (index, item) in catalog.gallery.items().iter().enumerate() {
            let button = match textures.get(&item.descriptor.thumbnail) {
                Some(texture) => egui::Button::image_and_text(
                    egui::Image::new(texture).max_width(THUMBNAIL_WIDTH),
                    item.descriptor.name.as_str(),
                ),
                None => egui::Button::new(item.descriptor.name.as_str())
                    .min_size(egui::vec2(THUMBNAIL_WIDTH, THUMBNAIL_WIDTH * 0.75)),
            };
            let response = ui.add(button.selected(item.selected));
            if !item.thumbnail.is_consumed() && ui.is_rect_visible(response.rect) {
                visible.push(index);
            }
            if let Some(activation) = activation(ui, &response) {
                events.push(AppEvent::ActivateTemplate { index, activation });
            }
        }
    });
}

fn text_section(
    ui: &mut egui::Ui,
    state: &AppState,
    config: &AppConfig,
    palette: &[Color],
    events: &mut Vec<AppEvent>,
) {
    let controls = &state.binding.controls;
    ui.heading("Text");

    let mut content = controls.content.clone();
    if ui
        .add(egui::TextEdit::multiline(&mut content).desired_rows(2))
        .changed()
    {
        events.push(AppEvent::Style(StyleInput::Content(content)));
    }
    if ui.button("Add text").clicked() {
        events.push(AppEvent::AddText);
    }

    egui::ComboBox::from_label("Font")
        .selected_text(controls.font_family.as_str())
        .show_ui(ui, |ui| {
            for family in &config.font_families {
                if ui
                    .selectable_label(*family == controls.font_family, family.as_str())
                    .clicked()
                {
                    events.push(AppEvent::Style(StyleInput::FontFamily(family.clone())));
                }
            }
        });

    let mut font_size = controls.font_size;
    if ui
        .add(egui::Slider::new(&mut font_size, 8..=200).text("Size"))
        .changed()
    {
        events.push(AppEvent::Style(StyleInput::FontSize(font_size)));
    }

    ui.horizontal(|ui| {
        let mut fill = controls.fill.rgb();
        if ui.color_edit_button_srgb(&mut fill).changed() {
            events.push(AppEvent::Style(StyleInput::Fill(Color(fill))));
        }
        ui.label("Color");
    });
    ui.horizontal_wrapped(|ui| {
        for color in palette {
            let response = ui.add(
                egui::Button::new("")
                    .fill(swatch(*color))
                    .min_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE)),
            );
            if let Some(activation) = activation(ui, &response) {
                events.push(AppEvent::SwatchActivated {
                    color: *color,
                    activation,
                });
            }
        }
    });

    ui.horizontal(|ui| {
        for align in TextAlign::ALL {
            let response = ui.selectable_label(controls.alignment() == align, align.label());
            if let Some(activation) = activation(ui, &response) {
                events.push(AppEvent::AlignActivated { align, activation });
            }
        }
    });

    let mut angle = controls.angle;
    if ui
        .add(egui::Slider::new(&mut angle, -180..=180).text("Rotation"))
        .changed()
    {
        events.push(AppEvent::Style(StyleInput::Angle(angle)));
    }

    ui.collapsing("Outline", |ui| {
        let mut width = controls.outline_width;
        if ui
            .add(egui::Slider::new(&mut width, 0..=20).text("Width"))
            .changed()
        {
            events.push(AppEvent::Style(StyleInput::OutlineWidth(width)));
        }
        ui.horizontal(|ui| {
            let mut color = controls.outline_color.rgb();
            if ui.color_edit_button_srgb(&mut color).changed() {
                events.push(AppEvent::Style(StyleInput::OutlineColor(Color(color))));
            }
            ui.label("Color");
        });
    });

    ui.collapsing("Shadow", |ui| {
        ui.horizontal(|ui| {
            let mut color = controls.shadow_color.rgb();
            if ui.color_edit_button_srgb(&mut color).changed() {
                events.push(AppEvent::Style(StyleInput::ShadowColor(Color(color))));
            }
            ui.label("Color");
        });
        let mut blur = controls.shadow_blur;
        if ui
            .add(egui::Slider::new(&mut blur, 0..=50).text("Blur"))
            .changed()
        {
            events.push(AppEvent::Style(StyleInput::ShadowBlur(blur)));
        }
        let mut offset_x = controls.shadow_offset_x;
        if ui
            .add(egui::Slider::new(&mut offset_x, -50..=50).text("Offset X"))
            .changed()
        {
            events.push(AppEvent::Style(StyleInput::ShadowOffsetX(offset_x)));
        }
        let mut offset_y = controls.shadow_offset_y;
        if ui
            .add(egui::Slider::new(&mut offset_y, -50..=50).text("Offset Y"))
            .changed()
        {
            events.push(AppEvent::Style(StyleInput::ShadowOffsetY(offset_y)));
        }
    });
}

fn logo_section(ui: &mut egui::Ui, state: &AppState, events: &mut Vec<AppEvent>) {
    ui.heading("Logo");
    if ui.button("Choose logo").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file()
        {
            events.push(AppEvent::LogoFile(path));
        }
    }
    ui.label("or drop an image onto the window");

    let mut opacity = state.logo_opacity;
    if ui
        .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"))
        .changed()
    {
        events.push(AppEvent::LogoOpacity(opacity));
    }
}

fn filter_section(ui: &mut egui::Ui, state: &AppState, events: &mut Vec<AppEvent>) {
    ui.heading("Filters");
    ui.horizontal_wrapped(|ui| {
        for filter in ImageFilter::ALL {
            let response = ui.selectable_label(state.filters.is_active(&filter), filter.label());
            if let Some(activation) = activation(ui, &response) {
                events.push(AppEvent::FilterActivated { filter, activation });
            }
        }
    });
}

fn output_section(
    ui: &mut egui::Ui,
    state: &AppState,
    config: &AppConfig,
    events: &mut Vec<AppEvent>,
) {
    ui.heading("Design");
    ui.horizontal(|ui| {
        if ui.button("Save design").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .set_file_name(DESIGN_FILE_NAME)
                .add_filter("Design", &["json"])
                .save_file()
            {
                events.push(AppEvent::SaveDesign(path));
            }
        }
        if ui.button("Load design").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Design", &["json"])
                .pick_file()
            {
                events.push(AppEvent::LoadDesign(path));
            }
        }
    });

    ui.heading("Export");
    ui.horizontal(|ui| {
        for format in ExportFormat::ALL {
            if ui
                .selectable_label(state.export_format == format, format.extension().to_uppercase())
                .clicked()
            {
                events.push(AppEvent::SetExportFormat(format));
            }
        }
        if ui.button("Export image").clicked() {
            if let Some(dir) = rfd::FileDialog::new()
                .set_directory(PathBuf::from(&config.export_dir))
                .pick_folder()
            {
                events.push(AppEvent::Export { dir });
            }
        }
    });
}

fn status_bar(ui: &mut egui::Ui, state: &AppState, events: &mut Vec<AppEvent>) {
    ui.horizontal(|ui| {
        match &state.status {
            Some(status) => {
                let text = egui::RichText::new(status.text.as_str());
                let text = match status.kind {
                    StatusKind::Error => text.color(ui.visuals().error_fg_color),
                    StatusKind::Info => text,
                };
                ui.label(text);
                if ui.small_button("Dismiss").clicked() {
                    events.push(AppEvent::DismissStatus);
                }
            }
            None => {
                ui.label(format!(
                    "{} templates · {}×{}",
                    state.catalog.templates.len(),
                    state.canvas.width,
                    state.canvas.height
                ));
            }
        }
    });
}

fn canvas_view(
    ui: &mut egui::Ui,
    state: &AppState,
    texture: &egui::TextureHandle,
    events: &mut Vec<AppEvent>,
) {
    let canvas = &state.canvas;
    let available = ui.available_size();
    let scale = fit_scale(canvas.width, canvas.height, available.x, available.y);
    let size = egui::vec2(canvas.width as f32 * scale, canvas.height as f32 * scale);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
    ui.painter().image(
        texture.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let pressed_at = if response.drag_started() {
        ui.input(|input| input.pointer.press_origin())
    } else if response.clicked() {
        response.interact_pointer_pos()
    } else {
        None
    };
    if let Some(pos) = pressed_at {
        let (x, y) = to_canvas_point((rect.min.x, rect.min.y), scale, (pos.x, pos.y));
        events.push(AppEvent::SelectAt { x, y });
    }
    if response.dragged() {
        let delta = response.drag_delta() / scale;
        if delta != egui::Vec2::ZERO {
            events.push(AppEvent::DragSelection {
                dx: delta.x,
                dy: delta.y,
            });
        }
    }
}

/// Largest scale that fits the canvas in the available area, never above 1.
fn fit_scale(width: u32, height: u32, available_width: f32, available_height: f32) -> f32 {
    let scale = (available_width / width.max(1) as f32).min(available_height / height.max(1) as f32);
    scale.clamp(0.05, 1.0)
}

fn to_canvas_point(origin: (f32, f32), scale: f32, pos: (f32, f32)) -> (f32, f32) {
    ((pos.0 - origin.0) / scale, (pos.1 - origin.1) / scale)
}

pub fn launch_editor(controller: ApplicationController) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Festive Post Generator",
        options,
        Box::new(|_cc| Ok(Box::new(EditorApp::new(controller)))),
    )
    .map_err(|error| format!("failed to start UI: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_shrunk_to_fit_but_never_enlarged() {
        assert_eq!(fit_scale(1080, 1080, 540.0, 800.0), 0.5);
        assert_eq!(fit_scale(100, 100, 900.0, 900.0), 1.0);
    }

    #[test]
    fn screen_points_map_back_to_canvas_pixels() {
        assert_eq!(to_canvas_point((10.0, 20.0), 0.5, (60.0, 70.0)), (100.0, 100.0));
    }
}
