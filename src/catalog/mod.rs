pub mod gallery;
pub mod manifest;
pub mod models;
pub mod queries;

pub use gallery::{Gallery, GalleryItem, LazyThumbnail};
pub use manifest::{load_catalog, spawn_catalog_load, CatalogLoadError};
pub use models::{CatalogViewState, TemplateDescriptor, ALL_CATEGORIES};
pub use queries::{category_label, derive_categories, filter_templates};
