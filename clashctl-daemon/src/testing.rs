//! In-memory fakes for the process, probe and download seams.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::UpdateError;
use crate::probe::Probe;
use crate::process::ProcessControl;
use crate::updater::Fetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Spawn {
        exe: PathBuf,
        args: Vec<String>,
        log: PathBuf,
    },
    Kill(PathBuf),
}

/// Records calls and tracks whether a daemon "is running".
#[derive(Default)]
pub struct FakeProcesses {
    calls: RefCell<Vec<Call>>,
    running: Cell<bool>,
    fail_spawn: bool,
    fail_kill: bool,
}

impl FakeProcesses {
    pub fn failing_spawn() -> Self {
        Self {
            fail_spawn: true,
            ..Self::default()
        }
    }

    pub fn failing_kill() -> Self {
        Self {
            fail_kill: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn running(&self) -> bool {
        self.running.get()
    }
}

impl ProcessControl for FakeProcesses {
    fn spawn_detached(&self, exe: &Path, args: &[&OsStr], log: &Path) -> io::Result<()> {
        if self.fail_spawn {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such daemon"));
        }
        self.calls.borrow_mut().push(Call::Spawn {
            exe: exe.to_path_buf(),
            args: args.iter().map(|a| a.to_string_lossy().into_owned()).collect(),
            log: log.to_path_buf(),
        });
        self.running.set(true);
        Ok(())
    }

    fn kill_by_name(&self, exe: &Path) -> io::Result<bool> {
        if self.fail_kill {
            return Err(io::Error::new(io::ErrorKind::NotFound, "pkill missing"));
        }
        self.calls.borrow_mut().push(Call::Kill(exe.to_path_buf()));
        Ok(self.running.replace(false))
    }
}

/// Answers pings from a fixed script; an exhausted script answers `false`.
pub struct ScriptedProbe {
    answers: RefCell<VecDeque<bool>>,
    pings: Cell<usize>,
}

impl ScriptedProbe {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            pings: Cell::new(0),
        }
    }

    pub fn pings(&self) -> usize {
        self.pings.get()
    }
}

impl Probe for ScriptedProbe {
    fn ping(&self) -> bool {
        self.pings.set(self.pings.get() + 1);
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

/// Writes fixed bytes to the staging path, or fails like a dead server.
pub struct FakeFetcher {
    body: Option<Vec<u8>>,
}

impl FakeFetcher {
    pub fn serving(body: &str) -> Self {
        Self {
            body: Some(body.as_bytes().to_vec()),
        }
    }

    pub fn unreachable() -> Self {
        Self { body: None }
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), UpdateError> {
        match &self.body {
            Some(body) => fs::write(dest, body).map_err(|source| UpdateError::Staging {
                path: dest.to_path_buf(),
                source,
            }),
            None => Err(UpdateError::Download {
                url: url.to_owned(),
                message: "connection refused".to_owned(),
            }),
        }
    }
}
