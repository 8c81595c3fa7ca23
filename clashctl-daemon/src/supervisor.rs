//! Daemon lifecycle: start, stop, reload.
//!
//! No process state is cached. `stop` is an idempotent kill-by-name and
//! `start` only reports success once the connectivity probe passes; a start
//! that fails the probe kills what it spawned.

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use clashctl_core::DaemonConfig;

use crate::error::SupervisorError;
use crate::probe::Probe;
use crate::process::ProcessControl;

/// Lifecycle operations as seen by the config updater.
pub trait Lifecycle {
    fn start(&self) -> bool;

    fn stop(&self);

    fn reload(&self) -> bool {
        self.stop();
        self.start()
    }
}

pub struct ProcessSupervisor<'a> {
    config: &'a DaemonConfig,
    processes: &'a dyn ProcessControl,
    probe: &'a dyn Probe,
}

impl<'a> ProcessSupervisor<'a> {
    pub fn new(
        config: &'a DaemonConfig,
        processes: &'a dyn ProcessControl,
        probe: &'a dyn Probe,
    ) -> Self {
        Self {
            config,
            processes,
            probe,
        }
    }

    fn try_start(&self) -> Result<(), SupervisorError> {
        let log = &self.config.daemon_log;
        reset_log(log).map_err(|source| SupervisorError::LogFile {
            path: log.clone(),
            source,
        })?;

        let exe = &self.config.daemon_exe;
        tracing::info!(exe = %exe.display(), "starting daemon");
        self.processes
            .spawn_detached(
                exe,
                &[OsStr::new("-d"), self.config.config_dir.as_os_str()],
                log,
            )
            .map_err(|source| SupervisorError::Spawn {
                exe: exe.clone(),
                source,
            })?;

        if !self.probe.ping() {
            self.stop();
            return Err(SupervisorError::Unreachable {
                endpoint: self.config.proxy_endpoint.clone(),
            });
        }
        Ok(())
    }
}

impl Lifecycle for ProcessSupervisor<'_> {
    fn start(&self) -> bool {
        match self.try_start() {
            Ok(()) => {
                tracing::info!("daemon started");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to start daemon");
                false
            }
        }
    }

    fn stop(&self) {
        let exe = &self.config.daemon_exe;
        match self.processes.kill_by_name(exe) {
            Ok(true) => tracing::info!(exe = %exe.display(), "daemon stopped"),
            Ok(false) => tracing::debug!(exe = %exe.display(), "daemon was not running"),
            Err(err) => tracing::warn!(exe = %exe.display(), error = %err, "kill failed"),
        }
    }
}

/// Remove the daemon log if present, then recreate it empty.
fn reset_log(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    fs::File::create(path).map(|_| ())
}
