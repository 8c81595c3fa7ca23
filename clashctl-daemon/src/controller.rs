//! The façade handed to the CLI.

use clashctl_core::{DaemonConfig, Mode, ProxyName};

use crate::control::RuntimeControlClient;
use crate::error::ControlError;
use crate::probe::{ConnectivityProbe, Probe};
use crate::process::{ProcessControl, SystemProcesses};
use crate::supervisor::{Lifecycle, ProcessSupervisor};
use crate::updater::{ConfigUpdater, Fetcher, HttpFetcher};

/// Composes lifecycle, probing, updating and runtime switching for one
/// daemon installation. Holds no state beyond its collaborators; every call
/// re-derives the truth from the OS or the daemon.
pub struct Controller {
    config: DaemonConfig,
    processes: Box<dyn ProcessControl>,
    probe: Box<dyn Probe>,
    fetcher: Box<dyn Fetcher>,
    control: RuntimeControlClient,
}

impl Controller {
    pub fn new(config: DaemonConfig) -> Self {
        let probe = ConnectivityProbe::from_config(&config);
        Self::with_parts(
            config,
            Box::new(SystemProcesses),
            Box::new(probe),
            Box::new(HttpFetcher::new()),
        )
    }

    pub fn with_parts(
        config: DaemonConfig,
        processes: Box<dyn ProcessControl>,
        probe: Box<dyn Probe>,
        fetcher: Box<dyn Fetcher>,
    ) -> Self {
        let control = RuntimeControlClient::from_config(&config);
        Self {
            config,
            processes,
            probe,
            fetcher,
            control,
        }
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    fn supervisor(&self) -> ProcessSupervisor<'_> {
        ProcessSupervisor::new(&self.config, self.processes.as_ref(), self.probe.as_ref())
    }

    pub fn start(&self) -> bool {
        self.supervisor().start()
    }

    pub fn stop(&self) {
        self.supervisor().stop()
    }

    pub fn reload(&self) -> bool {
        self.supervisor().reload()
    }

    pub fn ping(&self) -> bool {
        self.probe.ping()
    }

    pub fn update(&self, url: &str) -> bool {
        let supervisor = self.supervisor();
        ConfigUpdater::new(
            &self.config,
            &supervisor,
            self.probe.as_ref(),
            self.fetcher.as_ref(),
        )
        .update(url)
    }

    pub fn get_proxy(&self) -> Result<ProxyName, ControlError> {
        self.control.get_proxy()
    }

    pub fn get_proxies(&self) -> Option<Vec<ProxyName>> {
        self.control.get_proxies()
    }

    pub fn set_proxy(&self, name: &ProxyName) -> bool {
        self.control.set_proxy(name)
    }

    pub fn get_mode(&self) -> Result<Mode, ControlError> {
        self.control.get_mode()
    }

    pub fn set_mode(&self, mode: Mode) -> bool {
        self.control.set_mode(mode)
    }
}
