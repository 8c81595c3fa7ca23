//! Session configuration.
//!
//! A [`DaemonConfig`] is built once per invocation from the home directory and
//! is never mutated afterwards. Endpoints and control-API paths may be
//! overridden by an optional `~/clashctl/clashctl.yaml` overlay; file-system
//! paths always follow the fixed layout in [`crate::paths`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::paths;

/// Immutable description of one daemon installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// `~/clashctl`
    pub base_dir: PathBuf,
    /// Daemon executable, also the pattern used to kill it by name.
    pub daemon_exe: PathBuf,
    /// Daemon stdout/stderr, truncated before every start.
    pub daemon_log: PathBuf,
    /// clashctl's own log file.
    pub own_log: PathBuf,
    /// Directory passed to the daemon via `-d`.
    pub config_dir: PathBuf,
    /// Active configuration artifact.
    pub config_file: PathBuf,
    /// Download target for in-flight updates.
    pub staged_file: PathBuf,
    pub backup_suffix: String,
    /// Local HTTP proxy listen endpoint (`host:port`).
    pub proxy_endpoint: String,
    /// Control-API endpoint (`host:port`).
    pub controller_endpoint: String,
    pub mode_path: String,
    pub proxy_path: String,
    /// External URL fetched through the daemon by the connectivity probe.
    pub probe_url: String,
    pub probe_grace: Duration,
    pub probe_connect_timeout: Duration,
}

/// Optional overrides read from `clashctl.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverlay {
    pub proxy_endpoint: Option<String>,
    pub controller_endpoint: Option<String>,
    pub mode_path: Option<String>,
    pub proxy_path: Option<String>,
    pub probe_url: Option<String>,
}

impl DaemonConfig {
    /// Defaults for an installation under `<home>/clashctl`.
    pub fn from_home(home: &Path) -> Self {
        let base = paths::base_dir(home);
        Self {
            daemon_exe: paths::daemon_exe(&base),
            daemon_log: paths::daemon_log(&base),
            own_log: paths::own_log(&base),
            config_dir: paths::config_dir(&base),
            config_file: paths::config_file(&base),
            staged_file: paths::staged_file(&base),
            backup_suffix: paths::BACKUP_SUFFIX.to_owned(),
            proxy_endpoint: paths::PROXY_ENDPOINT.to_owned(),
            controller_endpoint: paths::CONTROLLER_ENDPOINT.to_owned(),
            mode_path: paths::MODE_PATH.to_owned(),
            proxy_path: paths::PROXY_PATH.to_owned(),
            probe_url: paths::PROBE_URL.to_owned(),
            probe_grace: paths::PROBE_GRACE,
            probe_connect_timeout: paths::PROBE_CONNECT_TIMEOUT,
            base_dir: base,
        }
    }

    /// Defaults plus the overlay at `<home>/clashctl/clashctl.yaml`, if present.
    pub fn load(home: &Path) -> Result<Self, CoreError> {
        let config = Self::from_home(home);
        let overlay = load_overlay(&paths::overlay_file(&config.base_dir))?;
        Ok(config.with_overlay(overlay))
    }

    /// Resolve `$HOME` and [`load`](Self::load) from it.
    pub fn discover() -> Result<Self, CoreError> {
        let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
        Self::load(&home)
    }

    pub fn with_overlay(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(v) = overlay.proxy_endpoint {
            self.proxy_endpoint = v;
        }
        if let Some(v) = overlay.controller_endpoint {
            self.controller_endpoint = v;
        }
        if let Some(v) = overlay.mode_path {
            self.mode_path = v;
        }
        if let Some(v) = overlay.proxy_path {
            self.proxy_path = v;
        }
        if let Some(v) = overlay.probe_url {
            self.probe_url = v;
        }
        self
    }

    /// The single backup generation of the active configuration.
    pub fn backup_file(&self) -> PathBuf {
        paths::with_suffix(&self.config_file, &self.backup_suffix)
    }

    /// Base URL of the control API, e.g. `http://localhost:9090`.
    pub fn controller_url(&self) -> String {
        with_http_scheme(&self.controller_endpoint)
    }
}

fn load_overlay(path: &Path) -> Result<ConfigOverlay, CoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ConfigOverlay::default()),
        Err(err) => return Err(io_err(path, err)),
    };
    if raw.trim().is_empty() {
        return Ok(ConfigOverlay::default());
    }
    serde_yaml::from_str(&raw).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn with_http_scheme(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.trim_end_matches('/').to_owned()
    } else {
        format!("http://{}", endpoint.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_fixed_layout() {
        let config = DaemonConfig::from_home(Path::new("/home/alice"));
        assert_eq!(config.base_dir, Path::new("/home/alice/clashctl"));
        assert_eq!(
            config.daemon_exe,
            Path::new("/home/alice/clashctl/clashctl-buildin-server")
        );
        assert_eq!(config.daemon_log, Path::new("/home/alice/clashctl/clash.log"));
        assert_eq!(config.own_log, Path::new("/home/alice/clashctl/clashctl.log"));
        assert_eq!(config.config_dir, Path::new("/home/alice/clashctl/config"));
        assert_eq!(
            config.config_file,
            Path::new("/home/alice/clashctl/config/config.yaml")
        );
        assert_eq!(
            config.backup_file(),
            Path::new("/home/alice/clashctl/config/config.yaml.backup")
        );
        assert_eq!(config.staged_file, Path::new("/home/alice/clashctl/update.yaml"));
        assert_eq!(config.proxy_endpoint, "127.0.0.1:7890");
        assert_eq!(config.controller_url(), "http://localhost:9090");
        assert_eq!(config.mode_path, "/proxies/Final");
        assert_eq!(config.proxy_path, "/proxies/Proxies");
        assert_eq!(config.probe_grace, Duration::from_secs(1));
        assert_eq!(config.probe_connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn controller_url_keeps_explicit_scheme() {
        assert_eq!(with_http_scheme("https://ctl.local:9090/"), "https://ctl.local:9090");
        assert_eq!(with_http_scheme("127.0.0.1:9090"), "http://127.0.0.1:9090");
    }
}
