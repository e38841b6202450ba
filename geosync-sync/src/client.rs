//! REST client for one GeoServer workspace.
//!
//! The client is built once and only read afterwards; it can be shared by
//! reference across every file of a run. HTTP goes through the [`Transport`]
//! trait so tests can substitute an in-memory server.

use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use geosync_core::{LayerName, LayerRecord, StoreName, SyncConfig};

use crate::collection::member_names;
use crate::error::SyncError;
use crate::payload::{DataStoreBody, FeatureTypeBody};

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request. `body` is a JSON document when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub body: Option<&'a str>,
}

/// Status and body of a response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns the response for any HTTP status.
///
/// Only failures that produce no response at all are errors.
pub trait Transport {
    fn send(&self, request: &ApiRequest<'_>) -> Result<ApiResponse, SyncError>;
}

/// Blocking HTTP transport with basic auth and JSON headers on every request.
///
/// No request timeout is configured.
pub struct UreqTransport {
    agent: ureq::Agent,
    authorization: String,
}

impl UreqTransport {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            authorization: format!("Basic {}", STANDARD.encode(format!("{user}:{password}"))),
        }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &ApiRequest<'_>) -> Result<ApiResponse, SyncError> {
        let req = self
            .agent
            .request(request.method.as_str(), request.url)
            .set("Authorization", &self.authorization)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");

        let result = match request.body {
            Some(body) => req.send_string(body),
            None => req.call(),
        };

        match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => {
                let status = response.status();
                let body = response.into_string().map_err(|e| SyncError::Transport {
                    url: request.url.to_string(),
                    message: e.to_string(),
                })?;
                Ok(ApiResponse { status, body })
            }
            Err(ureq::Error::Transport(err)) => Err(SyncError::Transport {
                url: request.url.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteCatalogClient
// ---------------------------------------------------------------------------

/// Lists and mutates datastores and feature types under one workspace.
#[derive(Debug)]
pub struct RemoteCatalogClient<T: Transport = UreqTransport> {
    transport: T,
    workspace: String,
    base_url: String,
}

impl RemoteCatalogClient<UreqTransport> {
    /// Client for the server and workspace named in `config`.
    pub fn new(config: &SyncConfig) -> Self {
        Self::with_transport(
            UreqTransport::new(&config.user, &config.password),
            &config.workspace,
            config.workspace_url(),
        )
    }
}

impl<T: Transport> RemoteCatalogClient<T> {
    /// `base_url` is the workspace URL, e.g.
    /// `http://localhost:8080/geoserver/rest/workspaces/TEST`.
    pub fn with_transport(transport: T, workspace: &str, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            workspace: workspace.to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn datastores_url(&self) -> String {
        format!("{}/datastores", self.base_url)
    }

    pub fn datastore_url(&self, store: &StoreName) -> String {
        format!("{}/datastores/{store}", self.base_url)
    }

    pub fn feature_types_url(&self, store: &StoreName) -> String {
        format!("{}/datastores/{store}/featuretypes", self.base_url)
    }

    pub fn feature_type_url(&self, store: &StoreName, layer: &LayerName) -> String {
        format!("{}/datastores/{store}/featuretypes/{layer}", self.base_url)
    }

    /// Names of every datastore in the workspace.
    ///
    /// A 404 means the workspace itself is missing and is reported as
    /// [`SyncError::WorkspaceMissing`], never as an empty list.
    pub fn list_datastores(&self) -> Result<Vec<StoreName>, SyncError> {
        let url = self.datastores_url();
        let response = self.get(&url)?;
        if response.status == 404 {
            return Err(SyncError::WorkspaceMissing {
                workspace: self.workspace.clone(),
            });
        }
        let names = self.collection(&url, &response, "dataStores", "dataStore")?;
        Ok(names.into_iter().map(StoreName).collect())
    }

    /// Create (`exists == false`, POST) or replace (PUT) the datastore.
    pub fn upsert_datastore(
        &self,
        store: &StoreName,
        absolute_path: &Path,
        exists: bool,
    ) -> Result<(), SyncError> {
        let (method, url) = if exists {
            (Method::Put, self.datastore_url(store))
        } else {
            (Method::Post, self.datastores_url())
        };
        let body = serde_json::to_string(&DataStoreBody::new(store, absolute_path))?;
        tracing::debug!("{method} {url} store {store}: {body}");

        let response = self.send(method, &url, Some(&body))?;
        if !response.is_success() {
            return Err(status_err(method, url, &response));
        }
        Ok(())
    }

    /// Names of every feature type configured under `store`.
    pub fn list_feature_types(&self, store: &StoreName) -> Result<Vec<LayerName>, SyncError> {
        let url = self.feature_types_url(store);
        let response = self.get(&url)?;
        let names = self.collection(&url, &response, "featureTypes", "featureType")?;
        Ok(names.into_iter().map(LayerName).collect())
    }

    /// Create (POST) or replace (PUT) the feature type for `layer`.
    ///
    /// Only 200 OK and 201 Created count as success.
    pub fn upsert_layer(
        &self,
        store: &StoreName,
        layer: &LayerRecord,
        exists: bool,
    ) -> Result<(), SyncError> {
        let (method, url) = if exists {
            (Method::Put, self.feature_type_url(store, &layer.name))
        } else {
            (Method::Post, self.feature_types_url(store))
        };
        let body = serde_json::to_string(&FeatureTypeBody::new(
            &self.workspace,
            &self.base_url,
            layer,
        ))?;
        tracing::debug!("{method} {url} layer {}: {body}", layer.name);

        let response = self.send(method, &url, Some(&body))?;
        if !matches!(response.status, 200 | 201) {
            return Err(status_err(method, url, &response));
        }
        Ok(())
    }

    fn get(&self, url: &str) -> Result<ApiResponse, SyncError> {
        self.send(Method::Get, url, None)
    }

    fn send(&self, method: Method, url: &str, body: Option<&str>) -> Result<ApiResponse, SyncError> {
        let response = self.transport.send(&ApiRequest { method, url, body })?;
        tracing::debug!("{method} {url} -> {}", response.status);
        Ok(response)
    }

    fn collection(
        &self,
        url: &str,
        response: &ApiResponse,
        outer: &str,
        inner: &str,
    ) -> Result<Vec<String>, SyncError> {
        if !response.is_success() {
            return Err(status_err(Method::Get, url.to_string(), response));
        }
        member_names(&response.body, outer, inner).map_err(|detail| {
            SyncError::MalformedResponse {
                url: url.to_string(),
                detail,
            }
        })
    }
}

fn status_err(method: Method, url: String, response: &ApiResponse) -> SyncError {
    SyncError::ApiStatus {
        method: method.as_str(),
        url,
        status: response.status,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
