use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::filters::ImageFilter;
use crate::canvas::logo::decode_logo;
use crate::canvas::model::{Background, Canvas, LogoElement, ObjectKind, TextElement};
use crate::canvas::style::TextStyle;
use crate::infra::fetch::AssetFetcher;

pub const DESIGN_VERSION: u32 = 1;
pub const DESIGN_FILE_NAME: &str = "festive-post-design.json";
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("design is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported design version {0}")]
    UnsupportedVersion(u32),
    #[error("logo is not a PNG data URL")]
    InvalidDataUrl,
    #[error("logo data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("logo image could not be decoded: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background: Option<BackgroundDocument>,
    #[serde(default)]
    pub filter: ImageFilter,
    /// Document order is drawing order.
    pub objects: Vec<ObjectDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundDocument {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectDocument {
    Textbox {
        left: f32,
        top: f32,
        #[serde(flatten)]
        style: TextStyle,
    },
    Image {
        left: f32,
        top: f32,
        opacity: f32,
        src: String,
    },
}

impl DesignDocument {
    pub fn from_canvas(canvas: &Canvas) -> Self {
        let objects = canvas
            .objects()
            .iter()
            .map(|object| match &object.kind {
                ObjectKind::Text(text) => ObjectDocument::Textbox {
                    left: text.left,
                    top: text.top,
                    style: text.style.clone(),
                },
                ObjectKind::Logo(logo) => ObjectDocument::Image {
                    left: logo.left,
                    top: logo.top,
                    opacity: logo.opacity,
                    src: format!(
                        "{PNG_DATA_URL_PREFIX}{}",
                        general_purpose::STANDARD.encode(logo.image.png.as_slice())
                    ),
                },
            })
            .collect();

        Self {
            version: DESIGN_VERSION,
            width: canvas.width,
            height: canvas.height,
            background: canvas.background.as_ref().map(|background| BackgroundDocument {
                src: background.source.clone(),
            }),
            filter: canvas.filter,
            objects,
        }
    }

    /// Rebuilds a canvas. A background that can no longer be fetched or decoded is
    /// dropped with a warning; broken logos fail the whole load.
    pub fn into_canvas(self, fetcher: &dyn AssetFetcher) -> Result<Canvas, DesignError> {
        if self.version != DESIGN_VERSION {
            return Err(DesignError::UnsupportedVersion(self.version));
        }

        let mut canvas = Canvas::new(self.width, self.height);
        canvas.filter = self.filter;
        if let Some(background) = self.background {
            canvas.background = load_background(fetcher, &background.src, self.width, self.height);
        }

        for object in self.objects {
            let kind = match object {
                ObjectDocument::Textbox { left, top, style } => {
                    ObjectKind::Text(TextElement { left, top, style })
                }
                ObjectDocument::Image {
                    left,
                    top,
                    opacity,
                    src,
                } => {
                    let encoded = src
                        .strip_prefix(PNG_DATA_URL_PREFIX)
                        .ok_or(DesignError::InvalidDataUrl)?;
                    let png = general_purpose::STANDARD.decode(encoded)?;
                    ObjectKind::Logo(LogoElement {
                        left,
                        top,
                        opacity,
                        image: decode_logo(png)?,
                    })
                }
            };
            canvas.add(kind);
        }
        Ok(canvas)
    }
}

pub fn load_background(
    fetcher: &dyn AssetFetcher,
    source: &str,
    width: u32,
    height: u32,
) -> Option<Background> {
    let bytes = match fetcher.fetch(source) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(source, %error, "background could not be fetched");
            return None;
        }
    };
    match Background::decode(source, &bytes, width, height) {
        Ok(background) => Some(background),
        Err(error) => {
            tracing::warn!(source, %error, "background could not be decoded");
            None
        }
    }
}

pub fn save_design(canvas: &Canvas) -> Result<String, DesignError> {
    Ok(serde_json::to_string_pretty(&DesignDocument::from_canvas(canvas))?)
}

pub fn load_design(json: &str, fetcher: &dyn AssetFetcher) -> Result<Canvas, DesignError> {
    let document: DesignDocument = serde_json::from_str(json)?;
    document.into_canvas(fetcher)
}
