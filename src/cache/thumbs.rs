use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use image::RgbaImage;

use crate::infra::fetch::AssetFetcher;

/// Longest edge of a gallery thumbnail.
pub const THUMBNAIL_EDGE: u32 = 256;

#[derive(Debug)]
pub enum ThumbnailOutcome {
    Ready { source: String, image: RgbaImage },
    Failed { source: String, error: String },
}

impl ThumbnailOutcome {
    pub fn source(&self) -> &str {
        match self {
            Self::Ready { source, .. } | Self::Failed { source, .. } => source,
        }
    }
}

/// Fetches and downsizes thumbnails on a worker thread. The UI submits sources as items
/// become visible and drains finished thumbnails once per frame. A source is fetched at
/// most once unless its previous attempt failed.
pub struct ThumbnailLoader {
    submit_tx: mpsc::Sender<String>,
    result_rx: mpsc::Receiver<ThumbnailOutcome>,
    in_flight: HashSet<String>,
    loaded: HashSet<String>,
}

impl ThumbnailLoader {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<String>();
        let (result_tx, result_rx) = mpsc::channel::<ThumbnailOutcome>();
        spawn_worker(submit_rx, result_tx, fetcher);
        Self {
            submit_tx,
            result_rx,
            in_flight: HashSet::new(),
            loaded: HashSet::new(),
        }
    }

    /// Queues a fetch. False when the source is already loaded or pending, or the worker
    /// has stopped.
    pub fn request(&mut self, source: String) -> bool {
        if self.loaded.contains(&source) || self.in_flight.contains(&source) {
            return false;
        }
        if self.submit_tx.send(source.clone()).is_err() {
            return false;
        }
        self.in_flight.insert(source);
        true
    }

    pub fn drain(&mut self) -> Vec<ThumbnailOutcome> {
        let outcomes: Vec<_> = self.result_rx.try_iter().collect();
        for outcome in &outcomes {
            self.in_flight.remove(outcome.source());
            if let ThumbnailOutcome::Ready { source, .. } = outcome {
                self.loaded.insert(source.clone());
            }
        }
        outcomes
    }

    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

/// Downsizes to fit within `edge`; smaller images are never enlarged.
pub fn decode_thumbnail(bytes: &[u8], edge: u32) -> image::ImageResult<RgbaImage> {
    let image = image::load_from_memory(bytes)?;
    if image.width() <= edge && image.height() <= edge {
        return Ok(image.to_rgba8());
    }
    Ok(image.thumbnail(edge, edge).to_rgba8())
}

fn spawn_worker(
    submit_rx: mpsc::Receiver<String>,
    result_tx: mpsc::Sender<ThumbnailOutcome>,
    fetcher: Arc<dyn AssetFetcher>,
) {
    thread::spawn(move || {
        while let Ok(source) = submit_rx.recv() {
            let outcome = match fetcher.fetch(&source) {
                Ok(bytes) => match decode_thumbnail(&bytes, THUMBNAIL_EDGE) {
                    Ok(image) => ThumbnailOutcome::Ready { source, image },
                    Err(error) => ThumbnailOutcome::Failed {
                        source,
                        error: error.to_string(),
                    },
                },
                Err(error) => ThumbnailOutcome::Failed {
                    source,
                    error: error.to_string(),
                },
            };
            if let ThumbnailOutcome::Failed { source, error } = &outcome {
                tracing::warn!(source = %source, error = %error, "thumbnail unavailable");
            }
            if result_tx.send(outcome).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::time::Duration;

    use image::{ImageFormat, Rgba};

    use super::*;
    use crate::infra::fetch::FetchError;

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

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("png should encode");
        bytes
    }

    #[test]
    fn thumbnails_keep_aspect_within_edge() {
        let image = decode_thumbnail(&png(1024, 512), THUMBNAIL_EDGE).expect("thumbnail");
        assert_eq!(image.dimensions(), (256, 128));
    }

    fn drain_until_idle(loader: &mut ThumbnailLoader) -> Vec<ThumbnailOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.extend(loader.drain());
            if !loader.is_busy() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        outcomes
    }

    #[test]
    fn loaded_sources_are_not_fetched_again() {
        let fetcher = FakeFetcher {
            files: HashMap::from([("thumb.png".to_string(), png(8, 8))]),
        };
        let mut loader = ThumbnailLoader::new(Arc::new(fetcher));
        assert!(loader.request("thumb.png".to_string()));
        assert!(!loader.request("thumb.png".to_string()));
        assert!(loader.request("missing.png".to_string()));

        let outcomes = drain_until_idle(&mut loader);
        assert_eq!(outcomes.len(), 2);
        assert!(!loader.is_busy());

        assert!(!loader.request("thumb.png".to_string()));
        assert!(loader.request("missing.png".to_string()));
    }

    #[test]
    fn worker_reports_ready_and_failed_sources() {
        let fetcher = FakeFetcher {
            files: HashMap::from([("thumb.png".to_string(), png(64, 32))]),
        };
        let mut loader = ThumbnailLoader::new(Arc::new(fetcher));
        assert!(loader.request("thumb.png".to_string()));
        assert!(loader.request("missing.png".to_string()));

        let first = loader
            .result_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("first thumbnail");
        let second = loader
            .result_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("second thumbnail");

        match first {
            ThumbnailOutcome::Ready { source, image } => {
                assert_eq!(source, "thumb.png");
                assert_eq!(image.dimensions(), (64, 32));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(second, ThumbnailOutcome::Failed { .. }));
        assert_eq!(second.source(), "missing.png");
    }
}
