use thiserror::Error;

use crate::canvas::{DesignError, ExportError};
use crate::catalog::CatalogLoadError;
use crate::infra::fetch::FetchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("image could not be decoded: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Design(#[from] DesignError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("failed to access {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
}
