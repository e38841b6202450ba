//! Shared fixtures: an in-memory GeoServer REST surface and package builders.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use geosync_sync::{ApiRequest, ApiResponse, Method, RemoteCatalogClient, SyncError, Transport};
use rusqlite::Connection;
use serde_json::{json, Value};

pub const WORKSPACE: &str = "ehri";
pub const BASE: &str = "http://localhost:8080/geoserver/rest/workspaces/ehri";

#[derive(Debug, Default)]
struct State {
    missing_workspace: bool,
    stores: BTreeMap<String, Value>,
    feature_types: BTreeMap<(String, String), Value>,
    fail_layer: Option<String>,
    log: Vec<(Method, String)>,
}

/// Emulates the datastore/featuretype endpoints of one workspace.
#[derive(Debug, Default)]
pub struct FakeGeoServer {
    state: RefCell<State>,
}

impl FakeGeoServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_workspace() -> Self {
        let server = Self::default();
        server.state.borrow_mut().missing_workspace = true;
        server
    }

    /// Seed a datastore as if created by an earlier run.
    pub fn with_store(self, name: &str, database: &str) -> Self {
        self.state.borrow_mut().stores.insert(
            name.to_string(),
            json!({"dataStore": {
                "name": name,
                "enabled": true,
                "connectionParameters": {"entry": [
                    {"@key": "database", "$": database},
                    {"@key": "dbtype", "$": "geopkg"}
                ]}
            }}),
        );
        self
    }

    /// Answer 500 to any create or update of the named layer.
    pub fn failing_layer(self, layer: &str) -> Self {
        self.state.borrow_mut().fail_layer = Some(layer.to_string());
        self
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.state.borrow().log.clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.state.borrow().log.iter().filter(|(m, _)| *m == method).count()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    pub fn store(&self, name: &str) -> Option<Value> {
        self.state.borrow().stores.get(name).cloned()
    }

    pub fn feature_type(&self, store: &str, layer: &str) -> Option<Value> {
        self.state
            .borrow()
            .feature_types
            .get(&(store.to_string(), layer.to_string()))
            .cloned()
    }

    pub fn snapshot(&self) -> (BTreeMap<String, Value>, BTreeMap<(String, String), Value>) {
        let state = self.state.borrow();
        (state.stores.clone(), state.feature_types.clone())
    }

    fn handle(&self, method: Method, path: &str, body: Option<&str>) -> (u16, String) {
        let mut state = self.state.borrow_mut();
        if state.missing_workspace {
            return (404, "No such workspace".to_string());
        }
        let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let body: Option<Value> = body.map(|b| serde_json::from_str(b).expect("JSON body"));

        match (method, parts.as_slice()) {
            (Method::Get, ["datastores"]) => {
                let names: Vec<Value> = state.stores.keys().map(|n| json!({"name": n})).collect();
                if names.is_empty() {
                    (200, json!({"dataStores": ""}).to_string())
                } else {
                    (200, json!({"dataStores": {"dataStore": names}}).to_string())
                }
            }
            (Method::Post, ["datastores"]) => {
                let body = body.expect("body");
                let name = body["dataStore"]["name"].as_str().expect("name").to_string();
                if state.stores.contains_key(&name) {
                    return (500, format!("Store '{name}' already exists"));
                }
                state.stores.insert(name.clone(), body);
                (201, name)
            }
            (Method::Put, ["datastores", store]) => {
                if !state.stores.contains_key(*store) {
                    return (404, format!("No such datastore: {store}"));
                }
                state.stores.insert(store.to_string(), body.expect("body"));
                (200, String::new())
            }
            (Method::Get, ["datastores", store, "featuretypes"]) => {
                if !state.stores.contains_key(*store) {
                    return (404, format!("No such datastore: {store}"));
                }
                let names: Vec<Value> = state
                    .feature_types
                    .keys()
                    .filter(|(s, _)| s.as_str() == *store)
                    .map(|(_, l)| json!({"name": l}))
                    .collect();
                if names.is_empty() {
                    (200, json!({"featureTypes": ""}).to_string())
                } else {
                    (200, json!({"featureTypes": {"featureType": names}}).to_string())
                }
            }
            (Method::Post, ["datastores", store, "featuretypes"]) => {
                let body = body.expect("body");
                let name = body["featureType"]["name"].as_str().expect("name").to_string();
                if state.fail_layer.as_deref() == Some(name.as_str()) {
                    return (500, "layer rejected".to_string());
                }
                let key = (store.to_string(), name.clone());
                if state.feature_types.contains_key(&key) {
                    return (500, format!("Resource named '{name}' already exists"));
                }
                state.feature_types.insert(key, body);
                (201, name)
            }
            (Method::Put, ["datastores", store, "featuretypes", layer]) => {
                if state.fail_layer.as_deref() == Some(*layer) {
                    return (500, "layer rejected".to_string());
                }
                let key = (store.to_string(), layer.to_string());
                if !state.feature_types.contains_key(&key) {
                    return (404, format!("No such feature type: {layer}"));
                }
                state.feature_types.insert(key, body.expect("body"));
                (200, String::new())
            }
            _ => (405, format!("unsupported: {method} {path}")),
        }
    }
}

impl Transport for FakeGeoServer {
    fn send(&self, request: &ApiRequest<'_>) -> Result<ApiResponse, SyncError> {
        self.state
            .borrow_mut()
            .log
            .push((request.method, request.url.to_string()));
        let path = request
            .url
            .strip_prefix(BASE)
            .unwrap_or_else(|| panic!("request outside workspace: {}", request.url));
        let (status, body) = self.handle(request.method, path, request.body);
        Ok(ApiResponse { status, body })
    }
}

pub fn client(server: FakeGeoServer) -> RemoteCatalogClient<FakeGeoServer> {
    RemoteCatalogClient::with_transport(server, WORKSPACE, BASE)
}

const CONTENTS_DDL: &str = "CREATE TABLE gpkg_contents (
    table_name TEXT NOT NULL PRIMARY KEY,
    data_type TEXT NOT NULL,
    identifier TEXT UNIQUE,
    description TEXT DEFAULT '',
    last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
    min_x DOUBLE, min_y DOUBLE, max_x DOUBLE, max_y DOUBLE,
    srs_id INTEGER
)";

/// Write a minimal GeoPackage with the given `(table, type, title, description)` rows.
pub fn make_package(dir: &Path, file_name: &str, rows: &[(&str, &str, &str, &str)]) -> PathBuf {
    let path = dir.join(file_name);
    let conn = Connection::open(&path).expect("create package");
    conn.execute(CONTENTS_DDL, []).expect("create catalog");
    for (table, dtype, title, description) in rows {
        conn.execute(
            "INSERT INTO gpkg_contents (table_name, data_type, identifier, description) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![table, dtype, title, description],
        )
        .expect("insert row");
    }
    path
}
