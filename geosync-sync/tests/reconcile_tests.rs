//! Reconciliation against an in-memory GeoServer.

mod support;

use std::path::Path;

use geosync_core::PackageError;
use geosync_sync::{
    pipeline::{self, ErrorPolicy, FileResult},
    sync_file, Method, SyncError, UpsertAction,
};
use serde_json::json;
use support::{client, make_package, FakeGeoServer, BASE};
use tempfile::TempDir;

fn parks(dir: &Path) -> std::path::PathBuf {
    make_package(
        dir,
        "parks.gpkg",
        &[("playgrounds", "features", "Playgrounds", "City playgrounds")],
    )
}

#[test]
fn first_sync_creates_store_and_layer() {
    let tmp = TempDir::new().unwrap();
    let path = parks(tmp.path());
    let c = client(FakeGeoServer::new());

    let outcome = sync_file(&c, &path).expect("sync");
    assert_eq!(outcome.store.as_str(), "parks");
    assert_eq!(outcome.store_action, UpsertAction::Created);
    assert_eq!(outcome.layers.len(), 1);
    assert_eq!(outcome.layers[0].action, UpsertAction::Created);

    let server = c.transport();
    let posts: Vec<_> = server
        .requests()
        .into_iter()
        .filter(|(m, _)| *m == Method::Post)
        .map(|(_, url)| url)
        .collect();
    assert_eq!(
        posts,
        vec![
            format!("{BASE}/datastores"),
            format!("{BASE}/datastores/parks/featuretypes"),
        ]
    );
    assert_eq!(server.count(Method::Put), 0);

    let layer = server.feature_type("parks", "playgrounds").expect("layer");
    assert_eq!(layer["featureType"]["keywords"]["string"], json!(["features"]));
    assert_eq!(layer["featureType"]["title"], "Playgrounds");
    assert_eq!(layer["featureType"]["namespace"]["name"], "ehri");

    let store = server.store("parks").expect("store");
    let database = &store["dataStore"]["connectionParameters"]["entry"][0]["$"];
    assert_eq!(database.as_str().unwrap(), format!("file://{}", path.display()));
}

#[test]
fn database_path_is_independent_of_spelling() {
    let tmp = TempDir::new().unwrap();
    let path = parks(tmp.path());
    std::fs::create_dir(tmp.path().join("sub")).unwrap();
    let c = client(FakeGeoServer::new());

    sync_file(&c, &tmp.path().join("sub/../parks.gpkg")).expect("sync");
    let before = c.transport().snapshot();
    sync_file(&c, &tmp.path().join("./sub/../parks.gpkg")).expect("resync");

    let store = c.transport().store("parks").expect("store");
    let database = &store["dataStore"]["connectionParameters"]["entry"][0]["$"];
    assert_eq!(database.as_str().unwrap(), format!("file://{}", path.display()));
    assert_eq!(c.transport().snapshot(), before);
}

#[test]
fn second_run_only_updates_and_leaves_state_unchanged() {
    let tmp = TempDir::new().unwrap();
    let path = parks(tmp.path());
    make_package(
        tmp.path(),
        "roads.gpkg",
        &[
            ("highways", "features", "Highways", ""),
            ("lanes", "features", "Lanes", "Bike lanes"),
        ],
    );
    let files = vec![path, tmp.path().join("roads.gpkg")];
    let c = client(FakeGeoServer::new());

    pipeline::run(&c, &files, ErrorPolicy::Abort).expect("first run");
    let after_first = c.transport().snapshot();
    c.transport().clear_log();

    let report = pipeline::run(&c, &files, ErrorPolicy::Abort).expect("second run");
    assert_eq!(c.transport().count(Method::Post), 0);
    assert_eq!(c.transport().count(Method::Put), 5);
    assert_eq!(c.transport().snapshot(), after_first);

    for result in &report.files {
        let FileResult::Synced(outcome) = result else {
            panic!("unexpected failure: {result:?}");
        };
        assert_eq!(outcome.store_action, UpsertAction::Updated);
        assert!(outcome.layers.iter().all(|l| l.action == UpsertAction::Updated));
    }
}

#[test]
fn existing_store_is_updated_not_created() {
    let tmp = TempDir::new().unwrap();
    let path = parks(tmp.path());
    let c = client(FakeGeoServer::new().with_store("parks", "file:///old/location/parks.gpkg"));

    let outcome = sync_file(&c, &path).expect("sync");
    assert_eq!(outcome.store_action, UpsertAction::Updated);

    let requests = c.transport().requests();
    assert!(requests.contains(&(Method::Put, format!("{BASE}/datastores/parks"))));
    assert!(!requests.contains(&(Method::Post, format!("{BASE}/datastores"))));

    let store = c.transport().store("parks").unwrap();
    let database = store["dataStore"]["connectionParameters"]["entry"][0]["$"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(database, format!("file://{}", path.display()));
}

#[test]
fn empty_catalog_issues_no_requests() {
    let tmp = TempDir::new().unwrap();
    let path = make_package(tmp.path(), "empty.gpkg", &[]);
    let c = client(FakeGeoServer::new());

    let err = sync_file(&c, &path).unwrap_err();
    assert!(matches!(err, SyncError::Package(PackageError::Empty { .. })), "got: {err}");
    assert!(c.transport().requests().is_empty());
}

#[test]
fn unreadable_package_issues_no_requests() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.gpkg");
    std::fs::write(&path, vec![0u8; 4096]).unwrap();
    let c = client(FakeGeoServer::new());

    let err = sync_file(&c, &path).unwrap_err();
    assert!(matches!(err, SyncError::Package(PackageError::Format { .. })), "got: {err}");
    assert!(c.transport().requests().is_empty());
}

#[test]
fn missing_workspace_is_reported() {
    let tmp = TempDir::new().unwrap();
    let path = parks(tmp.path());
    let c = client(FakeGeoServer::without_workspace());

    let err = sync_file(&c, &path).unwrap_err();
    assert!(matches!(err, SyncError::WorkspaceMissing { .. }), "got: {err}");
    assert_eq!(c.transport().requests().len(), 1);
}

#[test]
fn layer_failure_stops_remaining_layers() {
    let tmp = TempDir::new().unwrap();
    let path = make_package(
        tmp.path(),
        "roads.gpkg",
        &[
            ("highways", "features", "Highways", ""),
            ("lanes", "features", "Lanes", ""),
        ],
    );
    let c = client(FakeGeoServer::new().failing_layer("highways"));

    let err = sync_file(&c, &path).unwrap_err();
    assert!(matches!(err, SyncError::ApiStatus { status: 500, .. }), "got: {err}");
    assert!(c.transport().feature_type("roads", "lanes").is_none());
    let touched_lanes = c
        .transport()
        .requests()
        .iter()
        .any(|(_, url)| url.ends_with("/lanes"));
    assert!(!touched_lanes);
}

#[test]
fn abort_policy_stops_the_batch() {
    let tmp = TempDir::new().unwrap();
    let empty = make_package(tmp.path(), "a_empty.gpkg", &[]);
    let good = parks(tmp.path());
    let c = client(FakeGeoServer::new());

    let err = pipeline::run(&c, &[empty, good], ErrorPolicy::Abort).unwrap_err();
    assert!(matches!(err, SyncError::Package(PackageError::Empty { .. })));
    assert!(c.transport().store("parks").is_none());
}

#[test]
fn continue_policy_records_failure_and_carries_on() {
    let tmp = TempDir::new().unwrap();
    let empty = make_package(tmp.path(), "a_empty.gpkg", &[]);
    let good = parks(tmp.path());
    let c = client(FakeGeoServer::new());

    let report = pipeline::run(&c, &[empty.clone(), good], ErrorPolicy::Continue).expect("run");
    assert!(report.has_failures());
    assert_eq!(report.files.len(), 2);
    assert!(matches!(&report.files[0], FileResult::Failed { path, .. } if *path == empty));
    assert!(matches!(&report.files[1], FileResult::Synced(_)));
    assert!(c.transport().store("parks").is_some());
}
