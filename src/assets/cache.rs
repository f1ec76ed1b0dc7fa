use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::Context as _;
use image::{DynamicImage, RgbImage};

use crate::{
    assets::fit,
    foundation::{
        core::Resolution,
        error::{SlidecastError, SlidecastResult},
    },
};

/// Counters describing how often the cache had to do real work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Source images decoded from disk.
    pub decodes: u64,
    /// Letterboxed canvases computed.
    pub fits: u64,
    /// Fitted-canvas requests served from the cache.
    pub hits: u64,
}

type FitKey = (PathBuf, Resolution);

#[derive(Debug, Default)]
struct CacheInner {
    loaded: HashMap<PathBuf, Arc<DynamicImage>>,
    fitted: HashMap<FitKey, Arc<RgbImage>>,
    stats: CacheStats,
}

/// Run-scoped cache of decoded sources and letterboxed canvases.
///
/// Keys are immutable inputs, so concurrent readers are safe once a key is populated. A cold key
/// is computed outside the lock; if two callers race on it, the first insert wins and the
/// redundant result is dropped.
#[derive(Debug, Default)]
pub struct ImageCache {
    inner: Mutex<CacheInner>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a letterboxed canvas of exactly `target` for the image at `path`.
    ///
    /// The returned canvas is a private copy; mutating it never affects later calls.
    pub fn fitted_canvas(&self, path: &Path, target: Resolution) -> SlidecastResult<RgbImage> {
        let key = (path.to_path_buf(), target);
        {
            let mut inner = self.lock()?;
            if let Some(hit) = inner.fitted.get(&key).cloned() {
                inner.stats.hits += 1;
                return Ok(hit.as_ref().clone());
            }
        }

        let src = self.load(path)?;
        let fitted = Arc::new(fit::fit_to_canvas(&src, target)?);

        let mut inner = self.lock()?;
        inner.stats.fits += 1;
        let stored = inner.fitted.entry(key).or_insert(fitted);
        Ok(stored.as_ref().clone())
    }

    /// Decode the image at `path` once and keep it for the rest of the run.
    pub fn load(&self, path: &Path) -> SlidecastResult<Arc<DynamicImage>> {
        if let Some(hit) = self.lock()?.loaded.get(path).cloned() {
            return Ok(hit);
        }

        let decoded = Arc::new(image::open(path)?);
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "decoded source image"
        );

        let mut inner = self.lock()?;
        inner.stats.decodes += 1;
        Ok(inner
            .loaded
            .entry(path.to_path_buf())
            .or_insert(decoded)
            .clone())
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().map(|inner| inner.stats).unwrap_or_default()
    }

    /// Drop every cached image. Counters are kept.
    pub fn clear(&self) -> SlidecastResult<()> {
        let mut inner = self.lock()?;
        inner.loaded.clear();
        inner.fitted.clear();
        Ok(())
    }

    fn lock(&self) -> SlidecastResult<MutexGuard<'_, CacheInner>> {
        self.inner
            .lock()
            .map_err(|_| SlidecastError::Other(anyhow::anyhow!("image cache lock poisoned")))
    }
}

/// Check that `path` points at an existing file before asking the cache for it.
pub(crate) fn existing_visual(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.is_file())
}

/// Decode a rendered frame from disk.
pub(crate) fn open_frame(path: &Path) -> SlidecastResult<RgbImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to open frame '{}'", path.display()))?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
