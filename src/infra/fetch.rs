use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: i32 },
}

/// Reads the bytes behind a manifest, template or thumbnail reference.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError>;
}

/// Local paths go through the filesystem, `http(s)://` references through minreq.
#[derive(Debug, Default)]
pub struct DefaultFetcher;

impl AssetFetcher for DefaultFetcher {
    fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        if is_remote(source) {
            let response = minreq::get(source).send().map_err(|error| FetchError::Http {
                url: source.to_string(),
                message: error.to_string(),
            })?;
            if !(200..300).contains(&response.status_code) {
                return Err(FetchError::Status {
                    url: source.to_string(),
                    status: response.status_code,
                });
            }
            tracing::debug!(url = source, bytes = response.as_bytes().len(), "fetched remote asset");
            return Ok(response.into_bytes());
        }

        fs::read(source).map_err(|error| FetchError::Io {
            path: source.to_string(),
            error,
        })
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Location a manifest's relative entries are resolved against: the URL up to its last
/// path segment, or the parent directory of a local file.
pub fn manifest_root(source: &str) -> String {
    if is_remote(source) {
        let after_scheme = source.find("://").map_or(0, |index| index + 3);
        return match source[after_scheme..].rfind('/') {
            Some(index) => source[..after_scheme + index].to_string(),
            None => source.to_string(),
        };
    }
    match Path::new(source).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().to_string(),
        _ => ".".to_string(),
    }
}

/// Joins a manifest reference onto the asset root unless it is already absolute.
pub fn resolve_reference(asset_root: &str, reference: &str) -> String {
    if is_remote(reference) || reference.starts_with("data:") || Path::new(reference).is_absolute() {
        return reference.to_string();
    }
    if asset_root.is_empty() || asset_root == "." {
        return reference.to_string();
    }
    if is_remote(asset_root) {
        return format!(
            "{}/{}",
            asset_root.trim_end_matches('/'),
            reference.trim_start_matches("./")
        );
    }
    Path::new(asset_root)
        .join(reference)
        .to_string_lossy()
        .to_string()
}
