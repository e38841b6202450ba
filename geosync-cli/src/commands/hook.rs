//! `geoserver-sync hook`: CGI webhook handler.
//!
//! Reads the raw body from stdin and the signature from
//! `HTTP_X_HUB_SIGNATURE_256`, writes the CGI response to stdout, then pulls
//! and syncs `SYNC_DIR`. Failures after the response exit nonzero.

use std::io::Read;

use anyhow::{Context, Result};

use geosync_hook::{config::SIGNATURE_ENV, Gateway, GitCheckout, HookConfig, HookOutcome};
use geosync_sync::RemoteCatalogClient;

pub fn run() -> Result<()> {
    let config = HookConfig::from_env(|key| std::env::var(key).ok())
        .context("missing or invalid webhook environment")?;

    let mut body = Vec::new();
    std::io::stdin()
        .read_to_end(&mut body)
        .context("failed to read request body")?;
    let signature = std::env::var(SIGNATURE_ENV).ok();

    let client = RemoteCatalogClient::new(&config.sync);
    let gateway = Gateway::new(config, GitCheckout::default(), client);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match gateway
        .handle(&body, signature.as_deref(), &mut out)
        .context("webhook refresh/sync failed")?
    {
        HookOutcome::Rejected => {}
        HookOutcome::Synced(report) => {
            tracing::info!(files = report.files.len(), "webhook run finished");
        }
    }
    Ok(())
}
