//! OS-level process spawning and kill-by-name.

use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Seam between the supervisor and the operating system.
pub trait ProcessControl {
    /// Launch `exe` in the background with stdout and stderr appended to `log`.
    /// Returns once the process has been spawned; it is never waited on.
    fn spawn_detached(&self, exe: &Path, args: &[&OsStr], log: &Path) -> io::Result<()>;

    /// Kill every process whose command line matches `exe`.
    /// `Ok(false)` means nothing was running.
    fn kill_by_name(&self, exe: &Path) -> io::Result<bool>;
}

/// [`ProcessControl`] backed by `std::process` and `pkill`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcesses;

impl ProcessControl for SystemProcesses {
    fn spawn_detached(&self, exe: &Path, args: &[&OsStr], log: &Path) -> io::Result<()> {
        let stdout = OpenOptions::new().create(true).append(true).open(log)?;
        let stderr = stdout.try_clone()?;

        let mut cmd = Command::new(exe);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));

        // Own process group: a Ctrl-C aimed at clashctl must not reach the daemon.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn()?;
        tracing::debug!(pid = child.id(), exe = %exe.display(), "spawned daemon");
        Ok(())
    }

    fn kill_by_name(&self, exe: &Path) -> io::Result<bool> {
        let status = Command::new("pkill")
            .arg("-9")
            .arg("-f")
            .arg(exe)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        // pkill: 0 = matched, 1 = nothing matched, anything else is an error.
        match status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("pkill exited with {status}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread::sleep;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn spawn_detached_redirects_both_streams_to_log() {
        let dir = TempDir::new().expect("tempdir");
        let script = dir.path().join("fake-daemon.sh");
        fs::write(&script, "echo out-line\necho err-line 1>&2\n").expect("write script");
        let log = dir.path().join("clash.log");
        fs::write(&log, "").expect("touch log");

        SystemProcesses
            .spawn_detached(Path::new("/bin/sh"), &[script.as_os_str()], &log)
            .expect("spawn");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut content = String::new();
        while Instant::now() < deadline {
            content = fs::read_to_string(&log).expect("read log");
            if content.contains("out-line") && content.contains("err-line") {
                break;
            }
            sleep(Duration::from_millis(20));
        }
        assert!(content.contains("out-line"), "stdout missing: {content:?}");
        assert!(content.contains("err-line"), "stderr missing: {content:?}");
    }

    #[test]
    fn spawn_of_missing_binary_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let log = dir.path().join("clash.log");
        let err = SystemProcesses
            .spawn_detached(&dir.path().join("no-such-daemon"), &[], &log)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
