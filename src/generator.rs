use crate::{
    error::{GenError, Result},
    models::ImageGenerationRequest,
    services::ImageService,
    viewer::{open_best_effort, NoopViewer, Viewer},
};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Renders a refined prompt and persists every returned image under an output directory.
#[derive(Clone)]
pub struct ImageGenerator {
    service: Arc<dyn ImageService>,
    model_id: String,
    viewer: Arc<dyn Viewer>,
    clock: Clock,
}

impl ImageGenerator {
    pub fn new(service: Arc<dyn ImageService>, model_id: impl Into<String>) -> Self {
        Self {
            service,
            model_id: model_id.into(),
            viewer: Arc::new(NoopViewer),
            clock: Arc::new(Local::now),
        }
    }

    pub fn with_viewer(mut self, viewer: Arc<dyn Viewer>) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Local> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the saved paths in response order. The first one is handed to the viewer.
    pub async fn generate(&self, refined: &str, output_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir).map_err(|e| {
            GenError::GenerationError(format!(
                "cannot create output directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let request = ImageGenerationRequest::new(self.model_id.clone(), refined);
        let images = self
            .service
            .generate_images(request)
            .await
            .map_err(|e| GenError::GenerationError(e.to_string()))?;

        if images.is_empty() {
            return Err(GenError::GenerationError("No images generated".into()));
        }
        if images.len() > 1 {
            log::warn!("Service returned {} images for one request", images.len());
        }

        let mut saved = Vec::with_capacity(images.len());
        for image in images {
            let stamp = (self.clock)().format(TIMESTAMP_FORMAT).to_string();
            let path = next_free_path(output_dir, &stamp);

            fs::write(&path, &image.bytes).map_err(|e| {
                GenError::GenerationError(format!("cannot write {}: {}", path.display(), e))
            })?;
            log::info!("Saved {} bytes to {}", image.bytes.len(), path.display());
            saved.push(path);
        }

        if let Some(first) = saved.first() {
            open_best_effort(self.viewer.as_ref(), first);
        }

        Ok(saved)
    }
}

/// `img_<stamp>.png`, or `img_<stamp>_<n>.png` with the lowest `n` not already on disk.
pub fn next_free_path(dir: &Path, stamp: &str) -> PathBuf {
    let base = dir.join(format!("img_{}.png", stamp));
    if !base.exists() {
        return base;
    }

    (1..)
        .map(|n| dir.join(format!("img_{}_{}.png", stamp, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(base)
}
