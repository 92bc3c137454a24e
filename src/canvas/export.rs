use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::canvas::model::Canvas;
use crate::canvas::render::render;

pub const EXPORT_STEM: &str = "festive-post";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {error}")]
    Directory {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("failed to write {path}: {error}")]
    Write {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("unsupported export format {0:?}, expected png or jpeg")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Png, ExportFormat::Jpeg];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn file_name(self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Renders the canvas and writes `festive-post.<format>` into `dir` at full quality.
pub fn export_image(canvas: &Canvas, format: ExportFormat, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|error| ExportError::Directory {
        path: dir.display().to_string(),
        error,
    })?;
    let path = dir.join(format.file_name());
    let frame = render(canvas);

    match format {
        ExportFormat::Png => frame.save_with_format(&path, ImageFormat::Png)?,
        ExportFormat::Jpeg => {
            let file = File::create(&path).map_err(|error| ExportError::Write {
                path: path.display().to_string(),
                error,
            })?;
            let rgb = DynamicImage::ImageRgba8(frame).to_rgb8();
            JpegEncoder::new_with_quality(BufWriter::new(file), 100).encode_image(&rgb)?;
        }
    }

    tracing::info!(path = %path.display(), "image exported");
    Ok(path)
}
