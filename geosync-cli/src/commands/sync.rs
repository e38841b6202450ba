//! `geoserver-sync sync`: create or update datastores and layers.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use geosync_core::{ConfigOverrides, SyncConfig};
use geosync_sync::{
    pipeline::{self, ErrorPolicy, FileResult, FileSet, SyncReport},
    RemoteCatalogClient, UpsertAction,
};

/// Arguments for `geoserver-sync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// GeoServer host [default: localhost]
    #[arg(long)]
    pub host: Option<String>,

    /// GeoServer user [default: admin]
    #[arg(short, long)]
    pub user: Option<String>,

    /// GeoServer port [default: 8080]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// GeoServer workspace [default: TEST]
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Optional ini config file with a [sync] section.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory under which to apply the pattern [default: current directory]
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// File pattern to find under the directory, e.g. '*.gpkg'.
    #[arg(long, conflicts_with = "files")]
    pub pattern: Option<String>,

    /// Carry on with the remaining files when one fails.
    #[arg(long)]
    pub keep_going: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// One or more GeoPackage files.
    pub files: Vec<PathBuf>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let overrides = ConfigOverrides {
            host: self.host,
            port: self.port,
            user: self.user,
            workspace: self.workspace,
            dir: self.dir,
            pattern: self.pattern,
        };
        let config = SyncConfig::resolve(overrides, self.config.as_deref(), |key| {
            std::env::var(key).ok()
        })
        .context("failed to resolve configuration")?;

        let set = FileSet::for_run(self.files, &config)?;
        let policy = if self.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        };

        let client = RemoteCatalogClient::new(&config);
        let report = pipeline::run_set(&client, &set, policy)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report")?
            );
        } else {
            print_report(&report);
        }

        let failed = report.failures().count();
        if failed > 0 {
            bail!("{failed} of {} file(s) failed to sync", report.files.len());
        }
        Ok(())
    }
}

fn action_label(action: UpsertAction) -> String {
    match action {
        UpsertAction::Created => "created".green().to_string(),
        UpsertAction::Updated => "updated".cyan().to_string(),
    }
}

fn print_report(report: &SyncReport) {
    if report.files.is_empty() {
        println!("No GeoPackage files found.");
        return;
    }

    for result in &report.files {
        match result {
            FileResult::Synced(outcome) => {
                println!(
                    "✓ {} → datastore '{}' ({})",
                    outcome.path.display(),
                    outcome.store,
                    action_label(outcome.store_action)
                );
                for layer in &outcome.layers {
                    println!("  ·  {} ({})", layer.layer, action_label(layer.action));
                }
            }
            FileResult::Failed { path, error } => {
                println!("{} {}: {}", "✗".red(), path.display(), error);
            }
        }
    }
}
