use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::foundation::error::{DtiError, DtiResult};

/// Source of raw layer image bytes, keyed by image URL.
///
/// Implementations must be safe to call concurrently; the renderer fans out one call per layer.
#[async_trait]
pub trait LayerFetcher: Send + Sync {
    /// Fetch the bytes behind `url`.
    async fn fetch(&self, url: &str) -> DtiResult<Vec<u8>>;
}

/// In-memory fetcher backed by a URL to bytes map.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `url`, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(url.into(), bytes);
    }

    /// Builder form of [`MemoryFetcher::insert`].
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[async_trait]
impl LayerFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> DtiResult<Vec<u8>> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| DtiError::fetch(format!("no image registered for '{url}'")))
    }
}

/// Reads layer images from a local mirror of the asset host.
///
/// A URL maps to its path below `root` with the scheme, host, query and fragment dropped, so
/// `https://impress-asset-images.openneo.net/biology/000/005/5488/600x600.png?v2` is read from
/// `<root>/biology/000/005/5488/600x600.png`. Bare relative names map directly under `root`.
#[derive(Clone, Debug)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Serve files from under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory files are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path a URL maps to.
    pub fn path_for(&self, url: &str) -> DtiResult<PathBuf> {
        let no_query = url.split(['?', '#']).next().unwrap_or(url);
        let path = match no_query.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map_or("", |(_host, path)| path),
            None => no_query,
        };

        let mut out = self.root.clone();
        let mut segments = 0usize;
        for seg in path.split('/').filter(|s| !s.is_empty()) {
            if seg == "." || seg == ".." || seg.contains('\\') {
                return Err(DtiError::fetch(format!("url '{url}' escapes the layer directory")));
            }
            out.push(seg);
            segments += 1;
        }
        if segments == 0 || path.ends_with('/') {
            return Err(DtiError::fetch(format!("url '{url}' has no file name")));
        }
        Ok(out)
    }
}

#[async_trait]
impl LayerFetcher for DirFetcher {
    async fn fetch(&self, url: &str) -> DtiResult<Vec<u8>> {
        let path = self.path_for(url)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| DtiError::fetch(format!("read '{}': {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fetch.rs"]
mod tests;
