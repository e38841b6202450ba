//! Webhook gateway.
//!
//! ```text
//! Unverified ──signature ok──▶ Verified ──▶ respond 200, refresh, sync
//!            └─mismatch──────▶ Rejected ──▶ respond 400, nothing else
//! ```
//!
//! Both end states are terminal for one request. The response is written and
//! flushed before the refresh starts, so a refresh or sync failure cannot
//! change it; such failures are logged and returned to the caller.

use std::io::Write;
use std::path::Path;

use geosync_sync::{
    pipeline::{self, ErrorPolicy, FileSet, SyncReport},
    RemoteCatalogClient, SyncError, Transport,
};

use crate::checkout::Checkout;
use crate::config::HookConfig;
use crate::error::{io_err, HookError};
use crate::signature;

/// Verification state of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookState {
    #[default]
    Unverified,
    Verified,
    Rejected,
}

/// Status line and plain-text body sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookResponse {
    pub status: u16,
    pub body: String,
}

impl HookResponse {
    pub fn accepted() -> Self {
        Self {
            status: 200,
            body: String::new(),
        }
    }

    pub fn rejected() -> Self {
        Self {
            status: 400,
            body: "Unexpected payload\n".to_string(),
        }
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            _ => "Unknown",
        }
    }

    /// Write the response as CGI output: headers, blank line, body.
    pub fn write_cgi<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "Content-type: text/plain\r\n")?;
        if self.status != 200 {
            write!(out, "Status: {} {}\r\n", self.status, self.reason())?;
        }
        write!(out, "\r\n{}", self.body)?;
        out.flush()
    }
}

/// What happened to one request.
#[derive(Debug)]
pub enum HookOutcome {
    Rejected,
    Synced(SyncReport),
}

/// Runs the batch sync over a directory once the checkout is fresh.
pub trait SyncRunner {
    fn run(&self, dir: &Path, pattern: &str) -> Result<SyncReport, SyncError>;
}

impl<T: Transport> SyncRunner for RemoteCatalogClient<T> {
    fn run(&self, dir: &Path, pattern: &str) -> Result<SyncReport, SyncError> {
        let set = FileSet::from_inputs(Vec::new(), dir.to_path_buf(), Some(pattern.to_string()))?;
        pipeline::run_set(self, &set, ErrorPolicy::Abort)
    }
}

pub struct Gateway<C, S> {
    config: HookConfig,
    checkout: C,
    runner: S,
}

impl<C: Checkout, S: SyncRunner> Gateway<C, S> {
    pub fn new(config: HookConfig, checkout: C, runner: S) -> Self {
        Self {
            config,
            checkout,
            runner,
        }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Check the signature header against the raw body.
    pub fn verify(&self, body: &[u8], signature_header: Option<&str>) -> HookState {
        if signature::verify(self.config.secret.as_bytes(), body, signature_header) {
            HookState::Verified
        } else {
            HookState::Rejected
        }
    }

    /// Answer the request on `out`, then refresh and sync if it was verified.
    pub fn handle<W: Write>(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
        out: &mut W,
    ) -> Result<HookOutcome, HookError> {
        let state = self.verify(body, signature_header);

        let response = match state {
            HookState::Verified => HookResponse::accepted(),
            _ => HookResponse::rejected(),
        };
        response
            .write_cgi(out)
            .map_err(|e| io_err("cgi response", e))?;

        if state != HookState::Verified {
            tracing::warn!(bytes = body.len(), "rejected webhook with bad signature");
            return Ok(HookOutcome::Rejected);
        }

        match self.refresh_and_sync() {
            Ok(report) => {
                tracing::info!(
                    files = report.files.len(),
                    dir = %self.config.sync_dir().display(),
                    "webhook sync completed"
                );
                Ok(HookOutcome::Synced(report))
            }
            Err(err) => {
                tracing::error!(error = %err, "webhook sync failed after response was sent");
                Err(err)
            }
        }
    }

    fn refresh_and_sync(&self) -> Result<SyncReport, HookError> {
        self.checkout.refresh(self.config.sync_dir())?;
        let report = self
            .runner
            .run(self.config.sync_dir(), self.config.pattern())?;
        Ok(report)
    }
}
