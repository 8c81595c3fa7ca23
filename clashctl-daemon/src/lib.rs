//! Controller for the clash proxy daemon: lifecycle supervision, connectivity
//! probing, rollback-capable config updates and runtime proxy/mode switching.

pub mod control;
pub mod controller;
mod error;
pub mod log_rotation;
pub mod logging;
pub mod probe;
pub mod process;
pub mod supervisor;
pub mod updater;

#[cfg(test)]
pub(crate) mod testing;

pub use control::RuntimeControlClient;
pub use controller::Controller;
pub use error::{ControlError, SupervisorError, UpdateError};
pub use probe::{ConnectivityProbe, Probe, ProxyEnvGuard};
pub use process::{ProcessControl, SystemProcesses};
pub use supervisor::{Lifecycle, ProcessSupervisor};
pub use updater::{ConfigUpdater, Fetcher, HttpFetcher};
