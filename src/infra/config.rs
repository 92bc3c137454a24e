use std::env;

use crate::infra::fetch::manifest_root;

pub const MANIFEST_ENV: &str = "FESTIVE_POST_MANIFEST";
pub const EXPORT_DIR_ENV: &str = "FESTIVE_POST_EXPORT_DIR";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub manifest_source: String,
    /// Relative template and thumbnail references are resolved against this.
    pub asset_root: String,
    pub export_dir: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub logo_max_width: u32,
    pub logo_max_height: u32,
    pub font_families: Vec<String>,
    pub palette: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            manifest_source: "templates/templates.json".to_string(),
            asset_root: ".".to_string(),
            export_dir: ".".to_string(),
            canvas_width: 1080,
            canvas_height: 1080,
            logo_max_width: 400,
            logo_max_height: 400,
            font_families: [
                "Arial",
                "Verdana",
                "Georgia",
                "Times New Roman",
                "Courier New",
                "Impact",
            ]
            .iter()
            .map(|family| family.to_string())
            .collect(),
            palette: [
                "#ffffff", "#000000", "#d4af37", "#c0392b", "#e67e22", "#27ae60", "#2980b9",
                "#8e44ad",
            ]
            .iter()
            .map(|color| color.to_string())
            .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Points at another manifest; its relative entries resolve next to it.
    pub fn with_manifest(mut self, source: impl Into<String>) -> Self {
        self.manifest_source = source.into();
        self.asset_root = manifest_root(&self.manifest_source);
        self
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(manifest) = lookup(MANIFEST_ENV).filter(|value| !value.trim().is_empty()) {
            self = self.with_manifest(manifest);
        }
        if let Some(dir) = lookup(EXPORT_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            self.export_dir = dir;
        }
        self
    }
}
