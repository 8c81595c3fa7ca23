//! Tracing subscriber setup for the `clashctl` binary.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::log_rotation::{rotate_if_needed, MAX_LOG_BYTES, MAX_ROTATED_FILES};

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// level. With `log_file`, output is appended to that file (rotated first)
/// instead of stderr.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            if let Err(err) = rotate_if_needed(path, MAX_LOG_BYTES, MAX_ROTATED_FILES) {
                eprintln!("log rotation failed for {}: {err}", path.display());
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = builder.with_writer(io::stderr).try_init();
        }
    }
    Ok(())
}
