//! Repository acquisition.
//!
//! Clones a remote repository into a directory that belongs to exactly one
//! request. The directory name carries a fresh UUID, so concurrent requests
//! never touch each other's clones, and [`WorkingClone`] removes it when
//! dropped, whichever way the request ends.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A cloned working tree, deleted from disk on drop.
#[derive(Debug)]
pub struct WorkingClone {
    path: PathBuf,
}

impl WorkingClone {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingClone {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed working clone"),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove working clone")
            }
        }
    }
}

/// Clone `repo_url` into a new directory under `workspace_dir`.
///
/// The directory is named `<prefix>-<uuid>`. The full working tree is
/// checked out, `.git` included; filtering happens during aggregation.
///
/// Any failure is returned as is. Nothing is retried.
pub fn clone_repo(repo_url: &str, workspace_dir: &Path, prefix: &str) -> Result<WorkingClone> {
    std::fs::create_dir_all(workspace_dir).with_context(|| {
        format!(
            "Failed to create workspace directory: {}",
            workspace_dir.display()
        )
    })?;

    let dest = workspace_dir.join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
    if dest.exists() {
        std::fs::remove_dir_all(&dest)
            .with_context(|| format!("Failed to remove stale clone: {}", dest.display()))?;
    }

    // Owned from here on, so a failed clone still cleans up partial output.
    let clone = WorkingClone { path: dest };

    tracing::info!(repo_url, path = %clone.path.display(), "cloning repository");

    let output = clone_command(repo_url, &clone.path)
        .output()
        .with_context(|| "Failed to execute 'git clone'. Is git installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git clone failed: {}", stderr.trim());
    }

    tracing::info!(repo_url, "clone complete");
    Ok(clone)
}

/// `git clone` that fails instead of prompting for credentials on a tty.
fn clone_command(repo_url: &str, dest: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.env("GIT_TERMINAL_PROMPT", "0")
        .arg("clone")
        .arg("--")
        .arg(repo_url)
        .arg(dest);
    cmd
}
