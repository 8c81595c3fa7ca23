//! End-to-end connectivity check through the daemon's local proxy.
//!
//! The probe does not ask the control API whether the daemon is alive; it
//! sends a real request to an external host through the proxy endpoint, so a
//! daemon that listens but cannot route is reported as unavailable.

use std::env;
use std::ffi::OsString;
use std::thread::sleep;
use std::time::Duration;

use clashctl_core::DaemonConfig;

/// Proxy variables pointed at the daemon for the duration of a probe.
pub const PROXY_ENV_VARS: [&str; 6] = [
    "http_proxy",
    "https_proxy",
    "all_proxy",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "ALL_PROXY",
];

/// Anything that can answer "is traffic flowing through the daemon".
pub trait Probe {
    fn ping(&self) -> bool;
}

/// Scoped override of the process-wide proxy environment.
///
/// Every variable in [`PROXY_ENV_VARS`] is set on construction and put back
/// to its previous value (or removed) when the guard drops, including on
/// early return and unwinding.
#[must_use = "the proxy environment is restored as soon as the guard drops"]
pub struct ProxyEnvGuard {
    saved: Vec<(&'static str, Option<OsString>)>,
}

impl ProxyEnvGuard {
    pub fn set(proxy_url: &str) -> Self {
        let saved = PROXY_ENV_VARS
            .iter()
            .map(|&key| (key, env::var_os(key)))
            .collect();
        for key in PROXY_ENV_VARS {
            env::set_var(key, proxy_url);
        }
        Self { saved }
    }
}

impl Drop for ProxyEnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..) {
            match previous {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}

/// [`Probe`] that fetches `probe_url` through the daemon's HTTP proxy.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    proxy_url: String,
    target: String,
    grace: Duration,
    connect_timeout: Duration,
}

impl ConnectivityProbe {
    pub fn from_config(config: &DaemonConfig) -> Self {
        Self {
            proxy_url: format!("http://{}", config.proxy_endpoint),
            target: config.probe_url.clone(),
            grace: config.probe_grace,
            connect_timeout: config.probe_connect_timeout,
        }
    }

    /// The agent is pinned to the daemon's endpoint; a user proxy inherited
    /// from the environment must never stand in for the daemon.
    fn fetch_through_proxy(&self) -> Result<u16, String> {
        let proxy = ureq::Proxy::new(&self.proxy_url).map_err(|err| err.to_string())?;
        let agent = ureq::AgentBuilder::new()
            .proxy(proxy)
            .timeout_connect(self.connect_timeout)
            .build();

        match agent.get(&self.target).call() {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(status, _)) => Err(format!("HTTP {status}")),
            Err(err) => Err(err.to_string()),
        }
    }
}

impl Probe for ConnectivityProbe {
    fn ping(&self) -> bool {
        // Give a freshly spawned daemon time to bind its listener.
        sleep(self.grace);

        let result = {
            let _env = ProxyEnvGuard::set(&self.proxy_url);
            self.fetch_through_proxy()
        };

        match result {
            Ok(status) => {
                tracing::debug!(target_url = %self.target, status, "probe succeeded");
                true
            }
            Err(reason) => {
                tracing::warn!(
                    target_url = %self.target,
                    proxy = %self.proxy_url,
                    reason = %reason,
                    "probe failed"
                );
                false
            }
        }
    }
}
