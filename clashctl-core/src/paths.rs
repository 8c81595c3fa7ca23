use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BASE_DIR: &str = "clashctl";
pub const DAEMON_EXE: &str = "clashctl-buildin-server";
pub const DAEMON_LOG: &str = "clash.log";
pub const OWN_LOG: &str = "clashctl.log";
pub const CONFIG_DIR: &str = "config";
pub const CONFIG_FILE: &str = "config.yaml";
pub const STAGED_FILE: &str = "update.yaml";
pub const OVERLAY_FILE: &str = "clashctl.yaml";
pub const BACKUP_SUFFIX: &str = ".backup";

pub const PROXY_ENDPOINT: &str = "127.0.0.1:7890";
pub const CONTROLLER_ENDPOINT: &str = "localhost:9090";
pub const MODE_PATH: &str = "/proxies/Final";
pub const PROXY_PATH: &str = "/proxies/Proxies";

pub const PROBE_URL: &str = "http://google.com";
pub const PROBE_GRACE: Duration = Duration::from_secs(1);
pub const PROBE_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

pub fn base_dir(home: &Path) -> PathBuf {
    home.join(BASE_DIR)
}

pub fn daemon_exe(base: &Path) -> PathBuf {
    base.join(DAEMON_EXE)
}

pub fn daemon_log(base: &Path) -> PathBuf {
    base.join(DAEMON_LOG)
}

pub fn own_log(base: &Path) -> PathBuf {
    base.join(OWN_LOG)
}

pub fn config_dir(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file(base: &Path) -> PathBuf {
    config_dir(base).join(CONFIG_FILE)
}

pub fn staged_file(base: &Path) -> PathBuf {
    base.join(STAGED_FILE)
}

pub fn overlay_file(base: &Path) -> PathBuf {
    base.join(OVERLAY_FILE)
}

/// `<file><suffix>` next to `file`, e.g. `config.yaml.backup`.
pub fn with_suffix(file: &Path, suffix: &str) -> PathBuf {
    let mut os = file.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
