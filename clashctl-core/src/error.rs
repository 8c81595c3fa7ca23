//! Error types for clashctl-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from building the session configuration or
/// parsing domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure while reading the config overlay.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config overlay exists but is not valid YAML for [`ConfigOverlay`].
    ///
    /// [`ConfigOverlay`]: crate::config::ConfigOverlay
    #[error("failed to parse config overlay at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`; cannot locate `~/clashctl/`.
    #[error("cannot determine home directory; set $HOME")]
    HomeNotFound,

    /// A mode string outside the closed set `DIRECT` / `Proxies`.
    #[error("invalid mode '{value}'; expected one of: DIRECT, Proxies")]
    InvalidMode { value: String },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
