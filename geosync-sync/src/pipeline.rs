//! Batch entrypoint shared by the CLI and the webhook gateway.
//!
//! [`FileSet`] turns the command-line inputs into a list of package paths;
//! [`run`] syncs them one after another under an [`ErrorPolicy`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use glob::MatchOptions;
use serde::Serialize;

use geosync_core::{ConfigError, SyncConfig};

use crate::client::{RemoteCatalogClient, Transport};
use crate::error::{io_err, SyncError};
use crate::reconcile::{sync_file, FileOutcome};

// ---------------------------------------------------------------------------
// File discovery
// ---------------------------------------------------------------------------

/// Which package files a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSet {
    /// Files named explicitly, synced in the given order.
    Explicit(Vec<PathBuf>),
    /// Files under `dir` (recursively) whose name matches `pattern`.
    Pattern { dir: PathBuf, pattern: String },
}

impl FileSet {
    /// Build a file set from an explicit list and/or a pattern.
    ///
    /// Exactly one of the two must be given, and `dir` must be a directory.
    pub fn from_inputs(
        files: Vec<PathBuf>,
        dir: PathBuf,
        pattern: Option<String>,
    ) -> Result<Self, ConfigError> {
        let pattern = pattern.filter(|p| !p.is_empty());
        if !dir.is_dir() {
            return Err(ConfigError::InvalidDirectory { path: dir });
        }
        match (files.is_empty(), pattern) {
            (false, Some(_)) => Err(ConfigError::ConflictingInputs),
            (true, None) => Err(ConfigError::NoInput),
            (false, None) => Ok(FileSet::Explicit(files)),
            (true, Some(pattern)) => Ok(FileSet::Pattern { dir, pattern }),
        }
    }

    /// File set for a run configured by `config`.
    ///
    /// Files named on the command line take precedence over a pattern that
    /// came from settings, so `config.pattern` only applies when `files` is
    /// empty.
    pub fn for_run(files: Vec<PathBuf>, config: &SyncConfig) -> Result<Self, ConfigError> {
        let pattern = if files.is_empty() {
            config.pattern.clone()
        } else {
            None
        };
        Self::from_inputs(files, config.dir.clone(), pattern)
    }

    /// Resolve to concrete paths. Pattern matches are sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>, SyncError> {
        match self {
            FileSet::Explicit(files) => Ok(files.clone()),
            FileSet::Pattern { dir, pattern } => find_matching(dir, pattern),
        }
    }
}

fn find_matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, SyncError> {
    let root = dir.to_str().ok_or_else(|| ConfigError::InvalidDirectory {
        path: dir.to_path_buf(),
    })?;
    let full = format!(
        "{}/**/{pattern}",
        glob::Pattern::escape(root.trim_end_matches('/'))
    );
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob::glob_with(&full, options).map_err(|e| ConfigError::InvalidValue {
        key: "pattern".to_string(),
        value: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            io_err(path, e.into())
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    files.dedup();
    tracing::debug!("pattern {full} matched {} file(s)", files.len());
    Ok(files)
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// What to do when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop the whole run at the first failing file.
    #[default]
    Abort,
    /// Record the failure and carry on with the next file.
    Continue,
}

/// Result for one file of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileResult {
    Synced(FileOutcome),
    Failed { path: PathBuf, error: String },
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files: Vec<FileResult>,
}

impl SyncReport {
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files
            .iter()
            .filter(|r| matches!(r, FileResult::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Sync every file in `files`, in order, one at a time.
///
/// Under [`ErrorPolicy::Abort`] the first error is returned and later files
/// are not touched.
pub fn run<T: Transport>(
    client: &RemoteCatalogClient<T>,
    files: &[PathBuf],
    policy: ErrorPolicy,
) -> Result<SyncReport, SyncError> {
    let started_at = Utc::now();
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match sync_file(client, path) {
            Ok(outcome) => results.push(FileResult::Synced(outcome)),
            Err(err) if policy == ErrorPolicy::Continue => {
                tracing::error!("sync failed for {}: {err}", path.display());
                results.push(FileResult::Failed {
                    path: path.clone(),
                    error: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(SyncReport {
        started_at,
        finished_at: Utc::now(),
        files: results,
    })
}

/// Discover the files of `set` and [`run`] them.
pub fn run_set<T: Transport>(
    client: &RemoteCatalogClient<T>,
    set: &FileSet,
    policy: ErrorPolicy,
) -> Result<SyncReport, SyncError> {
    let files = set.discover()?;
    if files.is_empty() {
        tracing::warn!("no package files found for {set:?}");
    }
    run(client, &files, policy)
}
