use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use thiserror::Error;

use crate::catalog::models::TemplateDescriptor;
use crate::infra::fetch::{resolve_reference, AssetFetcher, FetchError};

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to fetch template manifest: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to parse template manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads the manifest once; relative `thumbnail`/`path` entries are resolved against `asset_root`.
pub fn load_catalog(
    fetcher: &dyn AssetFetcher,
    source: &str,
    asset_root: &str,
) -> Result<Vec<TemplateDescriptor>, CatalogLoadError> {
    let bytes = fetcher.fetch(source)?;
    let templates = parse_manifest(&bytes)?
        .into_iter()
        .map(|template| TemplateDescriptor {
            thumbnail: resolve_reference(asset_root, &template.thumbnail),
            path: resolve_reference(asset_root, &template.path),
            ..template
        })
        .collect::<Vec<_>>();

    tracing::info!(source, count = templates.len(), "template catalog loaded");
    Ok(templates)
}

/// Runs [`load_catalog`] on a worker thread; the single result arrives on the receiver.
pub fn spawn_catalog_load(
    fetcher: Arc<dyn AssetFetcher>,
    source: String,
    asset_root: String,
) -> mpsc::Receiver<Result<Vec<TemplateDescriptor>, CatalogLoadError>> {
    let (result_tx, result_rx) = mpsc::channel();
    thread::spawn(move || {
        let result = load_catalog(fetcher.as_ref(), &source, &asset_root);
        if let Err(error) = &result {
            tracing::error!(%error, source = %source, "template manifest load failed");
        }
        let _ = result_tx.send(result);
    });
    result_rx
}

pub fn parse_manifest(bytes: &[u8]) -> Result<Vec<TemplateDescriptor>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeFetcher {
        files: HashMap<String, Vec<u8>>,
    }

    impl AssetFetcher for FakeFetcher {
        fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError> {
            self.files.get(source).cloned().ok_or_else(|| FetchError::Io {
                path: source.to_string(),
                error: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            })
        }
    }

    fn fetcher_with(source: &str, body: &str) -> FakeFetcher {
        FakeFetcher {
            files: HashMap::from([(source.to_string(), body.as_bytes().to_vec())]),
        }
    }

    #[test]
    fn manifest_order_is_preserved_and_extra_fields_ignored() {
        let fetcher = fetcher_with(
            "templates.json",
            r#"[
                {"name": "Lamps", "category": "diwali", "thumbnail": "t/lamps.jpg", "path": "p/lamps.jpg", "author": "x"},
                {"name": "Pines", "category": "christmas", "thumbnail": "t/pines.jpg", "path": "p/pines.jpg"}
            ]"#,
        );

        let templates = load_catalog(&fetcher, "templates.json", ".").expect("manifest should load");
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].name, "Lamps");
        assert_eq!(templates[1].category, "christmas");
        assert_eq!(templates[0].path, "p/lamps.jpg");
    }

    #[test]
    fn relative_entries_resolve_against_remote_root() {
        let fetcher = fetcher_with(
            "https://cdn.example.com/templates.json",
            r#"[{"name": "Lamps", "category": "diwali", "thumbnail": "t/lamps.jpg", "path": "p/lamps.jpg"}]"#,
        );

        let templates = load_catalog(
            &fetcher,
            "https://cdn.example.com/templates.json",
            "https://cdn.example.com",
        )
        .expect("manifest should load");
        assert_eq!(templates[0].thumbnail, "https://cdn.example.com/t/lamps.jpg");
    }

    #[test]
    fn missing_manifest_is_a_fetch_error() {
        let fetcher = FakeFetcher {
            files: HashMap::new(),
        };
        let result = load_catalog(&fetcher, "templates.json", ".");
        assert!(matches!(result, Err(CatalogLoadError::Fetch(_))));
    }

    #[test]
    fn background_load_delivers_one_result() {
        let fetcher = fetcher_with(
            "templates.json",
            r#"[{"name": "Lamps", "category": "diwali", "thumbnail": "t.jpg", "path": "p.jpg"}]"#,
        );
        let receiver =
            spawn_catalog_load(Arc::new(fetcher), "templates.json".to_string(), String::new());

        let result = receiver
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("worker should report");
        assert_eq!(result.expect("manifest should load").len(), 1);
        assert!(receiver.recv().is_err());
    }

    #[test]
    fn malformed_manifest_is_a_parse_error() {
        let fetcher = fetcher_with("templates.json", r#"[{"name": "Lamps"}]"#);
        let result = load_catalog(&fetcher, "templates.json", ".");
        assert!(matches!(result, Err(CatalogLoadError::Parse(_))));
    }
}
