use serde::{Deserialize, Serialize};

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub name: String,
    pub category: String,
    pub thumbnail: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogViewState {
    pub active_category: String,
    pub search_term: String,
}

impl Default for CatalogViewState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_string(),
            search_term: String::new(),
        }
    }
}
