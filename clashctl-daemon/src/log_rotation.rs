//! Size-based rotation for clashctl's own log file.
//!
//! The daemon log never needs this: it is truncated on every start. The own
//! log is appended to across invocations, so it is rotated when it grows past
//! [`MAX_LOG_BYTES`], keeping [`MAX_ROTATED_FILES`] older copies:
//!   clashctl.log → clashctl.log.1 → clashctl.log.2 → clashctl.log.3

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const MAX_LOG_BYTES: u64 = 1024 * 1024;

pub const MAX_ROTATED_FILES: usize = 3;

/// Shift the generations of `log_path` up by one once the live file has
/// reached `max_bytes`. Whatever would land past `max_files` is dropped; the
/// live log itself becomes generation 1 and is recreated by the next writer.
///
/// Returns whether anything moved. A missing log is not an error.
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64, max_files: usize) -> io::Result<bool> {
    match fs::metadata(log_path) {
        Ok(meta) if meta.len() >= max_bytes => {}
        Ok(_) => return Ok(false),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    }

    // generations[0] is the live log, generations[n] is `<log>.<n>`.
    let generations: Vec<PathBuf> = (0..=max_files).map(|n| generation(log_path, n)).collect();
    ignore_missing(fs::remove_file(&generations[max_files]))?;
    for pair in generations.windows(2).rev() {
        ignore_missing(fs::rename(&pair[0], &pair[1]))?;
    }
    Ok(true)
}

/// `clashctl.log` for 0, `clashctl.log.<n>` otherwise.
fn generation(log_path: &Path, n: usize) -> PathBuf {
    if n == 0 {
        return log_path.to_path_buf();
    }
    let mut name = log_path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
