use std::path::PathBuf;

use crate::binding::StyleInput;
use crate::canvas::{Color, ExportFormat, ImageFilter, ObjectId, TextAlign};
use crate::catalog::{CatalogLoadError, TemplateDescriptor};
use crate::input::Activation;

#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded(Result<Vec<TemplateDescriptor>, CatalogLoadError>),
    ChooseCategory { category: String, activation: Activation },
    SearchChanged(String),
    ActivateTemplate { index: usize, activation: Activation },
    Style(StyleInput),
    AlignActivated { align: TextAlign, activation: Activation },
    SwatchActivated { color: Color, activation: Activation },
    AddText,
    SelectAt { x: f32, y: f32 },
    SelectionChanged(Option<ObjectId>),
    DragSelection { dx: f32, dy: f32 },
    LogoFile(PathBuf),
    LogoReceived(Vec<u8>),
    LogoOpacity(f32),
    FilterActivated { filter: ImageFilter, activation: Activation },
    SetExportFormat(ExportFormat),
    SaveDesign(PathBuf),
    LoadDesign(PathBuf),
    Export { dir: PathBuf },
    DismissStatus,
}
