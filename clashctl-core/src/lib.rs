//! clashctl core library — domain types, session configuration, file layout.
//!
//! - [`types`] — [`Mode`] and [`ProxyName`]
//! - [`config`] — [`DaemonConfig`] and its optional YAML overlay
//! - [`paths`] — file layout under `~/clashctl`
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use config::{ConfigOverlay, DaemonConfig};
pub use error::CoreError;
pub use types::{Mode, ProxyName};
