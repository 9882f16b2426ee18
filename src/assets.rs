//! Decorative animated assets
//!
//! Assets are addressed by a closed set of identifiers and resolved to GIF
//! bytes through an [`AssetLoader`]. A missing asset is never fatal: the
//! library logs a warning and the UI renders the turn without an image.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a decorative asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetId {
    /// Shown while the completion request is in flight
    LoadingIndicator,
    /// Baseline image for an ordinary assistant turn
    Conversing,
    Celebration,
    Crying,
    Startled,
}

impl AssetId {
    pub const ALL: [AssetId; 5] = [
        AssetId::LoadingIndicator,
        AssetId::Conversing,
        AssetId::Celebration,
        AssetId::Crying,
        AssetId::Startled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetId::LoadingIndicator => "loading-indicator",
            AssetId::Conversing => "conversing",
            AssetId::Celebration => "celebration",
            AssetId::Crying => "crying",
            AssetId::Startled => "startled",
        }
    }

    /// File name of the asset inside the asset directory
    pub fn file_name(self) -> &'static str {
        match self {
            AssetId::LoadingIndicator => "TokeruMendako.gif",
            AssetId::Conversing => "MendakoKaiwaTyu.gif",
            AssetId::Celebration => "MendakoKaiten.gif",
            AssetId::Crying => "MendakoNaki.gif",
            AssetId::Startled => "MendakoOdoroki.gif",
        }
    }

    pub fn media_type(self) -> &'static str {
        "image/gif"
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown asset id: {0}")]
pub struct UnknownAssetId(pub String);

impl FromStr for AssetId {
    type Err = UnknownAssetId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownAssetId(s.to_string()))
    }
}

/// Failure to resolve an asset to bytes
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("asset {id} not found at {}", .path.display())]
    NotFound { id: AssetId, path: PathBuf },
    #[error("failed to read asset {id}: {source}")]
    Io {
        id: AssetId,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves asset identifiers to raw bytes
pub trait AssetLoader: Send + Sync {
    fn load(&self, id: AssetId) -> Result<Vec<u8>, AssetLoadError>;
}

/// Loads assets from a directory on disk
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetLoader for FsAssetLoader {
    fn load(&self, id: AssetId) -> Result<Vec<u8>, AssetLoadError> {
        let path = self.root.join(id.file_name());
        std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AssetLoadError::NotFound { id, path }
            } else {
                AssetLoadError::Io { id, source }
            }
        })
    }
}

/// Preloaded asset bytes, shared read-only by every session
#[derive(Debug, Default)]
pub struct AssetLibrary {
    assets: HashMap<AssetId, Vec<u8>>,
}

impl AssetLibrary {
    /// Load every enabled asset once. Failures are logged and skipped.
    pub fn preload(loader: &dyn AssetLoader, enabled: &[AssetId]) -> Self {
        let mut assets = HashMap::new();
        for &id in enabled {
            match loader.load(id) {
                Ok(bytes) => {
                    tracing::debug!(asset = %id, size = bytes.len(), "Loaded asset");
                    assets.insert(id, bytes);
                }
                Err(e) => {
                    tracing::warn!(asset = %id, error = %e, "Asset unavailable, rendering without it");
                }
            }
        }
        Self { assets }
    }

    pub fn get(&self, id: AssetId) -> Option<&[u8]> {
        self.assets.get(&id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.assets.contains_key(&id)
    }

    /// URL the browser fetches the asset from, if it was loaded
    pub fn url(&self, id: AssetId) -> Option<String> {
        self.contains(id).then(|| format!("/api/assets/{id}"))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
