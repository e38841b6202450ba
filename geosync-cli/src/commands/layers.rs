//! `geoserver-sync layers`: show a package's catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use geosync_core::{package, LayerRecord, PackageFile};

/// Arguments for `geoserver-sync layers`.
#[derive(Args, Debug)]
pub struct LayersArgs {
    /// GeoPackage file to inspect.
    pub file: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct LayersJson<'a> {
    datastore: &'a str,
    layers: &'a [LayerRecord],
}

#[derive(Tabled)]
struct LayerTableRow {
    #[tabled(rename = "layer")]
    name: String,
    #[tabled(rename = "type")]
    data_type: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "description")]
    description: String,
}

impl LayersArgs {
    pub fn run(self) -> Result<()> {
        let package = PackageFile::new(&self.file)?;
        let layers = package::read_catalog(&package.path)
            .with_context(|| format!("failed to read {}", self.file.display()))?;

        if self.json {
            let payload = LayersJson {
                datastore: package.store.as_str(),
                layers: &layers,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize layers")?
            );
            return Ok(());
        }

        println!(
            "{} {} | {} layer(s)",
            "datastore".bold(),
            package.store,
            layers.len()
        );
        let rows: Vec<LayerTableRow> = layers
            .into_iter()
            .map(|layer| LayerTableRow {
                name: layer.name.0,
                data_type: layer.data_type,
                title: layer.title.unwrap_or_default(),
                description: layer.description.unwrap_or_default(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
