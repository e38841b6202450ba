//! # geosync-sync
//!
//! Reconcile GeoPackage files with the datastores and feature types of a
//! GeoServer workspace.
//!
//! Build a [`RemoteCatalogClient`] from a [`geosync_core::SyncConfig`], then
//! call [`sync_file`] for one package or [`pipeline::run`] for a batch.

pub mod client;
mod collection;
pub mod error;
pub mod payload;
pub mod pipeline;
pub mod reconcile;

pub use client::{ApiRequest, ApiResponse, Method, RemoteCatalogClient, Transport, UreqTransport};
pub use error::SyncError;
pub use pipeline::{ErrorPolicy, FileResult, FileSet, SyncReport};
pub use reconcile::{sync_file, FileOutcome, LayerOutcome, UpsertAction};
