//! GeoPackage catalog reader.
//!
//! A package is a SQLite file whose `gpkg_contents` table lists the layers it
//! holds. Only the leading four columns are read, positionally:
//!
//! ```text
//! table_name | data_type | identifier | description | ...
//!   name        tag        title        description
//! ```
//!
//! The connection is opened read-only and dropped before returning, on both
//! the success and the error path.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, Row};

use crate::error::PackageError;
use crate::types::{LayerName, LayerRecord};

/// The catalog query run against every package.
pub const CATALOG_QUERY: &str = "SELECT * FROM gpkg_contents";

/// Read the layer catalog of the package at `path`, in the table's row order.
///
/// Returns [`PackageError::Format`] if the file is not a SQLite container or
/// has no usable catalog, and [`PackageError::Empty`] if the catalog is empty.
pub fn read_catalog(path: &Path) -> Result<Vec<LayerRecord>, PackageError> {
    let format_err = |source| PackageError::Format {
        path: path.to_path_buf(),
        source,
    };

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(format_err)?;

    let layers = query_catalog(&conn).map_err(format_err)?;
    drop(conn);

    if layers.is_empty() {
        return Err(PackageError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(layers)
}

fn query_catalog(conn: &Connection) -> rusqlite::Result<Vec<LayerRecord>> {
    let mut stmt = conn.prepare(CATALOG_QUERY)?;
    let rows = stmt.query_map([], layer_from_row)?;
    let mut layers = Vec::new();
    for row in rows {
        let layer = row?;
        tracing::debug!("catalog row: {layer:?}");
        layers.push(layer);
    }
    Ok(layers)
}

fn layer_from_row(row: &Row<'_>) -> rusqlite::Result<LayerRecord> {
    Ok(LayerRecord {
        name: LayerName(row.get(0)?),
        data_type: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
    })
}
