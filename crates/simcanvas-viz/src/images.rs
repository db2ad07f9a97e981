//! Custom image loading.
//!
//! Identifiers name files under the host's `local/custom/` prefix. Loads run on
//! a worker thread (or inline, see [`LoadMode`]); results only become visible
//! after [`ImageCache::poll`], which the owner calls on the UI thread.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use image::{ImageReader, RgbaImage};

/// URL prefix under which custom images are served.
pub const CUSTOM_PREFIX: &str = "local/custom/";

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("invalid image id `{0}`")]
    InvalidId(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no image registered for `{0}`")]
    NotFound(String),
}

/// Source of decoded images, keyed by identifier.
pub trait ImageLoader: Send + Sync + 'static {
    fn load(&self, id: &str) -> Result<RgbaImage, ImageError>;
}

/// Serves `local/custom/<id>` from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an identifier to a file below the root.
    ///
    /// Identifiers are relative paths; a leading `local/custom/` is accepted and
    /// stripped. Absolute paths and `..` components are rejected.
    pub fn resolve(&self, id: &str) -> Result<PathBuf, ImageError> {
        let rel = id.strip_prefix(CUSTOM_PREFIX).unwrap_or(id);
        let rel_path = Path::new(rel);
        let valid = !rel.is_empty()
            && rel_path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !valid {
            return Err(ImageError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(rel_path))
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, id: &str) -> Result<RgbaImage, ImageError> {
        let path = self.resolve(id)?;
        let reader = ImageReader::open(&path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|source| ImageError::Io { path: path.clone(), source })?;
        let img = reader
            .decode()
            .map_err(|source| ImageError::Decode { path: path.clone(), source })?;
        log::debug!("decoded {} ({}x{})", path.display(), img.width(), img.height());
        Ok(img.to_rgba8())
    }
}

/// In-memory images; handy for hosts that bundle their assets.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageLoader {
    images: HashMap<String, Arc<RgbaImage>>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, id: impl Into<String>, image: RgbaImage) -> Self {
        self.images.insert(id.into(), Arc::new(image));
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, id: &str) -> Result<RgbaImage, ImageError> {
        self.images
            .get(id)
            .map(|img| img.as_ref().clone())
            .ok_or_else(|| ImageError::NotFound(id.to_string()))
    }
}

/// Where loads run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LoadMode {
    /// One short-lived worker thread per identifier.
    #[default]
    Background,
    /// Decode during [`ImageCache::request`]. The result is still only visible
    /// after the next [`ImageCache::poll`].
    Inline,
}

/// State of an identifier in the cache.
#[derive(Debug, Clone)]
pub enum ImageState {
    Ready(Arc<RgbaImage>),
    Loading,
    Failed,
}

struct Completion {
    id: String,
    result: Result<RgbaImage, ImageError>,
}

/// Decoded images by identifier, plus the queue of loads still in flight.
///
/// Each identifier is loaded at most once. Failures are remembered (and logged
/// once) so a broken image is not retried every frame.
pub struct ImageCache {
    loader: Arc<dyn ImageLoader>,
    mode: LoadMode,
    ready: HashMap<String, Arc<RgbaImage>>,
    failed: HashSet<String>,
    in_flight: HashSet<String>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl ImageCache {
    pub fn new(loader: impl ImageLoader) -> Self {
        Self::with_mode(loader, LoadMode::Background)
    }

    pub fn with_mode(loader: impl ImageLoader, mode: LoadMode) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            loader: Arc::new(loader),
            mode,
            ready: HashMap::new(),
            failed: HashSet::new(),
            in_flight: HashSet::new(),
            tx,
            rx,
        }
    }

    #[inline]
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Decoded image for `id`, if it already finished loading.
    pub fn get(&self, id: &str) -> Option<Arc<RgbaImage>> {
        self.ready.get(id).cloned()
    }

    /// Returns the state of `id`, starting a load the first time it is seen.
    pub fn request(&mut self, id: &str) -> ImageState {
        if let Some(img) = self.ready.get(id) {
            return ImageState::Ready(Arc::clone(img));
        }
        if self.failed.contains(id) {
            return ImageState::Failed;
        }
        if self.in_flight.insert(id.to_string()) {
            self.start_load(id);
        }
        ImageState::Loading
    }

    /// State of `id` without starting a load. Unknown ids report `Loading`.
    pub fn peek(&self, id: &str) -> ImageState {
        match self.ready.get(id) {
            Some(img) => ImageState::Ready(Arc::clone(img)),
            None if self.failed.contains(id) => ImageState::Failed,
            None => ImageState::Loading,
        }
    }

    /// True while any load has not been collected by [`poll`](Self::poll).
    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Moves finished loads into the cache. Returns how many completed.
    pub fn poll(&mut self) -> usize {
        let mut completed = 0;
        while let Ok(c) = self.rx.try_recv() {
            self.apply(c);
            completed += 1;
        }
        completed
    }

    /// Like [`poll`](Self::poll), but blocks until nothing is in flight.
    pub fn wait_all(&mut self) {
        while !self.in_flight.is_empty() {
            match self.rx.recv() {
                Ok(c) => self.apply(c),
                Err(_) => break,
            }
        }
    }

    fn apply(&mut self, Completion { id, result }: Completion) {
        self.in_flight.remove(&id);
        match result {
            Ok(img) => {
                log::debug!("image `{id}` ready");
                self.ready.insert(id, Arc::new(img));
            }
            Err(e) => {
                log::warn!("image `{id}` failed to load: {e}");
                self.failed.insert(id);
            }
        }
    }

    fn start_load(&mut self, id: &str) {
        match self.mode {
            LoadMode::Inline => {
                let result = self.loader.load(id);
                let _ = self.tx.send(Completion { id: id.to_string(), result });
            }
            LoadMode::Background => {
                let loader = Arc::clone(&self.loader);
                let tx = self.tx.clone();
                let id = id.to_string();
                let spawned = std::thread::Builder::new()
                    .name(format!("image-load:{id}"))
                    .spawn({
                        let id = id.clone();
                        move || {
                            let result = loader.load(&id);
                            // The cache may be gone; nothing to report to.
                            let _ = tx.send(Completion { id, result });
                        }
                    });
                if let Err(e) = spawned {
                    log::warn!("cannot spawn loader for `{id}`, loading inline: {e}");
                    let result = self.loader.load(&id);
                    let _ = self.tx.send(Completion { id, result });
                }
            }
        }
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("mode", &self.mode)
            .field("ready", &self.ready.len())
            .field("failed", &self.failed.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}
