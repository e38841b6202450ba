//! Per-file reconciliation.
//!
//! ## `sync_file` protocol
//!
//! 1. Read the package catalog (no network on failure or empty catalog).
//! 2. Derive the datastore name from the file stem.
//! 3. List datastores; membership decides POST (create) or PUT (update).
//! 4. Upsert the datastore.
//! 5. For each catalog row in order: list feature types, then upsert the layer.
//!
//! Existence is decided by name only. An existing datastore pointing at a
//! different file is overwritten with the new connection parameters. Any
//! error aborts the remaining layers of the file.

use std::path::{Path, PathBuf};

use serde::Serialize;

use geosync_core::{package, LayerName, LayerRecord, PackageFile, StoreName};

use crate::client::{RemoteCatalogClient, Transport};
use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Whether a remote resource was created or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

impl UpsertAction {
    pub fn from_exists(exists: bool) -> Self {
        if exists {
            UpsertAction::Updated
        } else {
            UpsertAction::Created
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerOutcome {
    pub layer: LayerName,
    pub action: UpsertAction,
}

/// Outcome of syncing a single package file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub store: StoreName,
    pub store_action: UpsertAction,
    pub layers: Vec<LayerOutcome>,
}

// ---------------------------------------------------------------------------
// sync_file
// ---------------------------------------------------------------------------

/// Publish every layer of the package at `path` into the client's workspace.
pub fn sync_file<T: Transport>(
    client: &RemoteCatalogClient<T>,
    path: &Path,
) -> Result<FileOutcome, SyncError> {
    tracing::info!("import file: {}", path.display());
    let package = PackageFile::new(path)?;
    let layers = package::read_catalog(&package.path)?;
    let absolute = package
        .absolute_path()
        .map_err(|e| io_err(&package.path, e))?;

    let store_action = sync_store(client, &package.store, &absolute)?;
    tracing::info!(
        "store exists for {}: {}",
        path.display(),
        store_action == UpsertAction::Updated
    );

    let mut outcomes = Vec::with_capacity(layers.len());
    for layer in &layers {
        let action = sync_layer(client, &package.store, layer)?;
        tracing::info!(
            "layer {} exists for {}: {}",
            layer.name,
            path.display(),
            action == UpsertAction::Updated
        );
        outcomes.push(LayerOutcome {
            layer: layer.name.clone(),
            action,
        });
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        store: package.store,
        store_action,
        layers: outcomes,
    })
}

fn sync_store<T: Transport>(
    client: &RemoteCatalogClient<T>,
    store: &StoreName,
    absolute: &Path,
) -> Result<UpsertAction, SyncError> {
    let exists = client.list_datastores()?.contains(store);
    client.upsert_datastore(store, absolute, exists)?;
    Ok(UpsertAction::from_exists(exists))
}

fn sync_layer<T: Transport>(
    client: &RemoteCatalogClient<T>,
    store: &StoreName,
    layer: &LayerRecord,
) -> Result<UpsertAction, SyncError> {
    let exists = client.list_feature_types(store)?.contains(&layer.name);
    client.upsert_layer(store, layer, exists)?;
    Ok(UpsertAction::from_exists(exists))
}
