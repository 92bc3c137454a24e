pub mod design;
pub mod export;
pub mod filters;
pub mod logo;
pub mod model;
pub mod render;
pub mod style;
pub mod text;

pub use design::{load_design, save_design, DesignError, DESIGN_FILE_NAME};
pub use export::{export_image, ExportError, ExportFormat};
pub use filters::ImageFilter;
pub use model::{Canvas, CanvasObject, LogoElement, ObjectId, ObjectKind, SelectionEvent, TextElement};
pub use style::{Color, Outline, Shadow, TextAlign, TextStyle};
