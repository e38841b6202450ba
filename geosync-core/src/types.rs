//! Domain types for GeoPackage sync.
//!
//! All path fields use `PathBuf`; remote resource names are newtypes so a
//! datastore name can never be passed where a layer name is expected.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PackageError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of a remote datastore. Derived from a package file's stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreName(pub String);

impl StoreName {
    /// The file name without its final extension: `/a/b/parks.gpkg` → `parks`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for StoreName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StoreName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Name of a published feature type (layer) inside a datastore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerName(pub String);

impl LayerName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LayerName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LayerName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One row of a package's `gpkg_contents` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub name: LayerName,
    /// Catalog data-type tag, e.g. `features` or `tiles`.
    pub data_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A package file on disk together with the datastore name it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub path: PathBuf,
    pub store: StoreName,
}

impl PackageFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, PackageError> {
        let path = path.into();
        let store =
            StoreName::from_path(&path).ok_or_else(|| PackageError::NoIdentifier {
                path: path.clone(),
            })?;
        Ok(Self { path, store })
    }

    /// Absolute form of the path with `.` and `..` folded lexically.
    /// Symlinks are not resolved.
    pub fn absolute_path(&self) -> std::io::Result<PathBuf> {
        std::path::absolute(&self.path).map(|p| normalize(&p))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
