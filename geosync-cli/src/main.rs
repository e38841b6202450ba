//! geoserver-sync: publish GeoPackage layers to a GeoServer workspace.
//!
//! # Usage
//!
//! ```text
//! geoserver-sync sync [--host H] [-u USER] [-p PORT] [-w WORKSPACE] [-c CONFIG] [FILE]...
//! geoserver-sync sync --pattern '*.gpkg' [-d DIR] [--keep-going] [--json]
//! geoserver-sync hook            # CGI webhook: body on stdin, signature in env
//! geoserver-sync layers <FILE> [--json]
//! ```
//!
//! The map server password is read from `GEOSERVER_PASSWORD` or the config file.

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{layers::LayersArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "geoserver-sync",
    version,
    about = "Import GeoPackage layers into a GeoServer instance",
    long_about = None,
)]
struct Cli {
    /// Show debug info.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update datastores and layers for a set of GeoPackage files.
    Sync(SyncArgs),

    /// Handle a signed push webhook as a CGI script, then pull and sync.
    Hook,

    /// List the layers a GeoPackage would publish, without contacting the server.
    Layers(LayersArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Hook => commands::hook::run(),
        Commands::Layers(args) => args.run(),
    }
}
