//! JSON request bodies for datastore and feature type upserts.
//!
//! Both bodies are full replacements: every field the sync manages is sent on
//! every request, so a PUT with an unchanged package leaves the remote
//! resource exactly as it was.

use std::path::Path;

use serde::Serialize;

use geosync_core::{LayerRecord, StoreName};

/// GeoServer store type for GeoPackage-backed datastores.
pub const GEOPACKAGE_DBTYPE: &str = "geopkg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStoreBody {
    #[serde(rename = "dataStore")]
    pub data_store: DataStore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStore {
    pub name: String,
    pub enabled: bool,
    #[serde(rename = "connectionParameters")]
    pub connection_parameters: ConnectionParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionParameters {
    pub entry: Vec<Entry>,
}

/// One `{"@key": .., "$": ..}` connection parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(rename = "@key")]
    pub key: String,
    #[serde(rename = "$")]
    pub value: String,
}

impl DataStoreBody {
    /// Datastore named `store` reading the package at `absolute_path`.
    pub fn new(store: &StoreName, absolute_path: &Path) -> Self {
        Self {
            data_store: DataStore {
                name: store.to_string(),
                enabled: true,
                connection_parameters: ConnectionParameters {
                    entry: vec![
                        Entry {
                            key: "database".to_string(),
                            value: format!("file://{}", absolute_path.display()),
                        },
                        Entry {
                            key: "dbtype".to_string(),
                            value: GEOPACKAGE_DBTYPE.to_string(),
                        },
                    ],
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureTypeBody {
    #[serde(rename = "featureType")]
    pub feature_type: FeatureType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureType {
    pub name: String,
    #[serde(rename = "nativeName")]
    pub native_name: String,
    pub namespace: Namespace,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Keywords,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keywords {
    pub string: Vec<String>,
}

impl FeatureTypeBody {
    /// Feature type for `layer`, namespaced under `workspace`.
    pub fn new(workspace: &str, workspace_url: &str, layer: &LayerRecord) -> Self {
        Self {
            feature_type: FeatureType {
                name: layer.name.to_string(),
                native_name: layer.name.to_string(),
                namespace: Namespace {
                    name: workspace.to_string(),
                    href: format!("{workspace_url}.json"),
                },
                title: layer.title.clone(),
                description: layer.description.clone(),
                keywords: Keywords {
                    string: vec![layer.data_type.clone()],
                },
            },
        }
    }
}
