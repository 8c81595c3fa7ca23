//! Subscription update with single-generation backup and rollback.
//!
//! ## `update` — stage protocol
//!
//! 1. Normalise the URL (reject empty, strip surrounding quotes).
//! 2. Download to the staging file.
//! 3. Check the staged artifact is a YAML mapping.
//! 4. Copy the active config to `<active>.backup` (if the active config exists).
//! 5. Copy the staged artifact next to the active config, then rename it over.
//! 6. `reload()` + `ping()` against the new config.
//! 7. On failure: put back what step 4 saved, or remove the rejected config
//!    when there was none, then stop and report failure.
//!    On success: stop, report success.
//!
//! Every write to the active path is a rename, so a failure at any step
//! leaves either the old bytes or the new bytes there, never a prefix. The
//! daemon is always stopped once step 6 has run.

use std::fs;
use std::io;
use std::path::Path;

use clashctl_core::{paths, DaemonConfig};

use crate::error::UpdateError;
use crate::probe::Probe;
use crate::supervisor::Lifecycle;

pub const DOWNLOAD_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Suffix of the scratch copy renamed over the active config.
pub const SWAP_SUFFIX: &str = ".swap";

/// Downloads a configuration artifact to a local path.
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), UpdateError>;
}

/// [`Fetcher`] over plain HTTP(S), streaming the body to disk.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(DOWNLOAD_TIMEOUT).build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), UpdateError> {
        let response = self.agent.get(url).call().map_err(|err| {
            let message = match err {
                ureq::Error::Status(status, _) => format!("HTTP {status}"),
                other => other.to_string(),
            };
            UpdateError::Download {
                url: url.to_owned(),
                message,
            }
        })?;

        let staging = |source: io::Error| UpdateError::Staging {
            path: dest.to_path_buf(),
            source,
        };
        let mut file = fs::File::create(dest).map_err(staging)?;
        if let Err(err) = io::copy(&mut response.into_reader(), &mut file) {
            drop(file);
            let _ = fs::remove_file(dest);
            return Err(UpdateError::Download {
                url: url.to_owned(),
                message: err.to_string(),
            });
        }
        file.sync_all().map_err(staging)?;
        tracing::info!(url, path = %dest.display(), "downloaded config file");
        Ok(())
    }
}

pub struct ConfigUpdater<'a> {
    config: &'a DaemonConfig,
    lifecycle: &'a dyn Lifecycle,
    probe: &'a dyn Probe,
    fetcher: &'a dyn Fetcher,
}

impl<'a> ConfigUpdater<'a> {
    pub fn new(
        config: &'a DaemonConfig,
        lifecycle: &'a dyn Lifecycle,
        probe: &'a dyn Probe,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            config,
            lifecycle,
            probe,
            fetcher,
        }
    }

    /// Replace the active config with the artifact at `url`. The daemon is
    /// left stopped whatever the outcome.
    pub fn update(&self, url: &str) -> bool {
        match self.try_update(url) {
            Ok(()) => {
                tracing::info!(path = %self.config.config_file.display(), "config file updated");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "update failed");
                false
            }
        }
    }

    pub fn try_update(&self, url: &str) -> Result<(), UpdateError> {
        let url = normalize_url(url)?;
        let staged = &self.config.staged_file;
        let active = &self.config.config_file;
        let backup = self.config.backup_file();

        self.fetcher.fetch(url, staged)?;
        check_artifact(staged)?;

        let backed_up = active.exists();
        if backed_up {
            tracing::info!(path = %backup.display(), "backing up old config file");
            fs::copy(active, &backup).map_err(|source| UpdateError::Backup {
                path: backup.clone(),
                source,
            })?;
        }

        tracing::info!(path = %active.display(), "updating config file");
        fs::create_dir_all(&self.config.config_dir)
            .and_then(|()| replace_file(staged, active))
            .map_err(|source| UpdateError::Swap {
                path: active.clone(),
                source,
            })?;

        tracing::info!("testing new config file");
        let valid = self.lifecycle.reload() && self.probe.ping();
        if !valid {
            tracing::error!("invalid config file, recovering old config file");
            roll_back(backed_up.then_some(backup.as_path()), active);
            self.lifecycle.stop();
            return Err(UpdateError::Validation);
        }

        self.lifecycle.stop();
        Ok(())
    }
}

/// Reject URLs shorter than two characters and strip one pair of
/// surrounding double quotes.
pub fn normalize_url(url: &str) -> Result<&str, UpdateError> {
    if url.len() < 2 {
        return Err(UpdateError::InvalidUrl {
            url: url.to_owned(),
        });
    }
    let trimmed = url
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(url);
    if trimmed.trim().is_empty() {
        return Err(UpdateError::InvalidUrl {
            url: url.to_owned(),
        });
    }
    Ok(trimmed)
}

/// A daemon config is a YAML mapping; anything else (an HTML error page, an
/// empty body) is rejected before it can replace the active config.
fn check_artifact(path: &Path) -> Result<(), UpdateError> {
    let invalid = |reason: String| UpdateError::InvalidArtifact {
        path: path.to_path_buf(),
        reason,
    };
    let raw = fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&raw).map_err(|err| invalid(err.to_string()))?;
    if value.is_mapping() {
        Ok(())
    } else {
        Err(invalid("top level is not a mapping".to_owned()))
    }
}

/// Atomically replace `dest` with a copy of `src`: the bytes land in a
/// sibling scratch file first and are renamed over `dest` once synced.
fn replace_file(src: &Path, dest: &Path) -> io::Result<()> {
    let scratch = paths::with_suffix(dest, SWAP_SUFFIX);
    let result = fs::copy(src, &scratch)
        .and_then(|_| fs::File::open(&scratch)?.sync_all())
        .and_then(|()| fs::rename(&scratch, dest));
    if result.is_err() && scratch.is_file() {
        let _ = fs::remove_file(&scratch);
    }
    result
}

/// Return `active` to its pre-update state. `backup` is the copy taken by
/// this run; without one there was no active config, so the rejected file
/// is removed. Failures are logged, never fatal.
fn roll_back(backup: Option<&Path>, active: &Path) {
    let result = match backup {
        Some(backup) => replace_file(backup, active),
        None => {
            tracing::warn!("no backup to recover from, removing rejected config file");
            match fs::remove_file(active) {
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            }
        }
    };
    if let Err(err) = result {
        tracing::error!(
            path = %active.display(),
            error = %err,
            "failed to recover old config file"
        );
    }
}
