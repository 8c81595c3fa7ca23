//! Client for the daemon's HTTP control API.
//!
//! Reads return `Result`/`Option` values and writes return `bool`; every
//! transport, status, JSON and data failure is logged here and never escapes
//! as a panic. Writes are only reported successful after a read-back shows
//! the daemon actually switched.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use clashctl_core::{DaemonConfig, Mode, ProxyName};

use crate::error::ControlError;

pub const CONTROL_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
pub const CONTROL_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of `GET <proxy-path>` and `GET <mode-path>`.
#[derive(Debug, Deserialize)]
struct SelectorState {
    #[serde(default)]
    now: Option<String>,
    #[serde(default)]
    all: Option<Vec<ProxyName>>,
}

/// Body of `PUT <proxy-path>` and `PUT <mode-path>`.
#[derive(Debug, Serialize)]
struct SelectRequest<'a> {
    name: &'a str,
}

pub struct RuntimeControlClient {
    agent: ureq::Agent,
    base_url: String,
    mode_path: String,
    proxy_path: String,
}

impl RuntimeControlClient {
    pub fn from_config(config: &DaemonConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONTROL_CONNECT_TIMEOUT)
            .timeout(CONTROL_TIMEOUT)
            .build();
        Self {
            agent,
            base_url: config.controller_url(),
            mode_path: config.mode_path.clone(),
            proxy_path: config.proxy_path.clone(),
        }
    }

    /// The currently active proxy.
    pub fn get_proxy(&self) -> Result<ProxyName, ControlError> {
        self.read_proxy().map_err(|err| log_failure(err, "failed to get proxy"))
    }

    /// Every proxy the daemon offers, in daemon order. `None` on failure;
    /// `Some(vec![])` when the daemon really has none.
    pub fn get_proxies(&self) -> Option<Vec<ProxyName>> {
        let url = self.url(&self.proxy_path);
        self.get_json::<SelectorState>(&url)
            .and_then(|state| {
                state
                    .all
                    .ok_or(ControlError::MissingField { url, field: "all" })
            })
            .map_err(|err| log_failure(err, "failed to get proxies"))
            .ok()
    }

    pub fn set_proxy(&self, name: &ProxyName) -> bool {
        let result = self
            .put_name(&self.proxy_path, name.as_str())
            .and_then(|()| self.read_proxy())
            .and_then(|now| {
                if now == *name {
                    Ok(())
                } else {
                    Err(ControlError::NotApplied {
                        expected: name.to_string(),
                        actual: now.to_string(),
                    })
                }
            });
        match result {
            Ok(()) => {
                tracing::info!(proxy = %name, "proxy switched");
                true
            }
            Err(err) => {
                log_failure(err, "failed to set proxy");
                false
            }
        }
    }

    pub fn get_mode(&self) -> Result<Mode, ControlError> {
        self.read_mode().map_err(|err| log_failure(err, "failed to get mode"))
    }

    pub fn set_mode(&self, mode: Mode) -> bool {
        let result = self
            .put_name(&self.mode_path, mode.as_str())
            .and_then(|()| self.read_mode())
            .and_then(|now| {
                if now == mode {
                    Ok(())
                } else {
                    Err(ControlError::NotApplied {
                        expected: mode.to_string(),
                        actual: now.to_string(),
                    })
                }
            });
        match result {
            Ok(()) => {
                tracing::info!(%mode, "mode switched");
                true
            }
            Err(err) => {
                log_failure(err, "failed to set mode");
                false
            }
        }
    }

    fn read_proxy(&self) -> Result<ProxyName, ControlError> {
        let url = self.url(&self.proxy_path);
        let state: SelectorState = self.get_json(&url)?;
        match state.now {
            Some(now) if !now.is_empty() => Ok(ProxyName(now)),
            _ => Err(ControlError::MissingField { url, field: "now" }),
        }
    }

    fn read_mode(&self) -> Result<Mode, ControlError> {
        let url = self.url(&self.mode_path);
        let state: SelectorState = self.get_json(&url)?;
        let now = state
            .now
            .ok_or(ControlError::MissingField { url, field: "now" })?;
        now.parse::<Mode>().map_err(|_| ControlError::InvalidMode { value: now })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ControlError> {
        let body = self
            .agent
            .get(url)
            .call()
            .map_err(|err| request_error(url, err))?
            .into_string()
            .map_err(|err| ControlError::Transport {
                url: url.to_owned(),
                message: err.to_string(),
            })?;

        serde_json::from_str(&body).map_err(|source| ControlError::Json {
            url: url.to_owned(),
            source,
        })
    }

    fn put_name(&self, path: &str, name: &str) -> Result<(), ControlError> {
        let url = self.url(path);
        let payload = serde_json::to_string(&SelectRequest { name }).map_err(|source| {
            ControlError::Json {
                url: url.clone(),
                source,
            }
        })?;
        // The daemon expects the JSON body labelled as text/plain.
        self.agent
            .put(&url)
            .set("Content-Type", "text/plain")
            .send_string(&payload)
            .map(|_| ())
            .map_err(|err| request_error(&url, err))
    }
}

fn request_error(url: &str, err: ureq::Error) -> ControlError {
    match err {
        ureq::Error::Status(status, _) => ControlError::Status {
            url: url.to_owned(),
            status,
        },
        other => ControlError::Transport {
            url: url.to_owned(),
            message: other.to_string(),
        },
    }
}

fn log_failure(err: ControlError, what: &str) -> ControlError {
    tracing::error!(error = %err, "{what}");
    err
}
