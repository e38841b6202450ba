//! Refreshing the local checkout before a sync.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::error::{io_err, HookError};

/// Brings the working copy in `dir` up to date.
pub trait Checkout {
    fn refresh(&self, dir: &Path) -> Result<(), HookError>;
}

/// Runs `git pull` in the checkout and fails on a nonzero exit.
#[derive(Debug, Clone)]
pub struct GitCheckout {
    program: OsString,
}

impl Default for GitCheckout {
    fn default() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }
}

impl GitCheckout {
    /// Use a different executable in place of `git`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Checkout for GitCheckout {
    fn refresh(&self, dir: &Path) -> Result<(), HookError> {
        let output = Command::new(&self.program)
            .arg("pull")
            .current_dir(dir)
            .output()
            .map_err(|e| io_err(dir, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        tracing::debug!(dir = %dir.display(), stdout = %stdout.trim(), "git pull finished");

        if !output.status.success() {
            return Err(HookError::Refresh {
                dir: dir.to_path_buf(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
