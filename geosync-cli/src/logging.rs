//! Subscriber setup. Logs go to stderr; stdout is reserved for command output
//! and the CGI response.

use tracing_subscriber::{fmt, EnvFilter};

const CRATES: [&str; 4] = ["geosync_core", "geosync_sync", "geosync_hook", "geoserver_sync"];

pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_filter(debug: bool) -> EnvFilter {
    let level = if debug { "debug" } else { "info" };
    let directives = CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(format!("warn,{directives}"))
}
