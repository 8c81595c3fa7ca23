//! `clashctl mode` — show or switch between direct and proxied routing.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use clashctl_core::Mode;
use clashctl_daemon::Controller;

use crate::picker::{self, Menu};

#[derive(Args, Debug)]
pub struct ModeArgs {
    /// `direct` or `proxies`; opens the picker when omitted.
    pub mode: Option<ModeArg>,
}

/// Case-insensitive wrapper so clap can parse `Mode` from CLI args.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeArg(pub Mode);

impl FromStr for ModeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self(Mode::Direct)),
            "proxies" => Ok(Self(Mode::Proxies)),
            other => Err(format!("unknown mode '{other}'; expected: direct, proxies")),
        }
    }
}

impl fmt::Display for ModeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ModeArgs {
    pub fn run(self, ctl: &Controller) -> Result<()> {
        if let Some(ModeArg(mode)) = self.mode {
            return switch(ctl, mode);
        }

        let current = ctl
            .get_mode()
            .context("failed to read the current mode from clash")?;
        let labels = Mode::ALL.iter().map(ToString::to_string).collect();
        let current_idx = Mode::ALL.iter().position(|m| *m == current);

        match picker::pick(Menu::new(labels, current_idx))
            .context("failed to run the mode picker")?
        {
            Some(idx) => switch(ctl, Mode::ALL[idx]),
            None => {
                println!("Mode unchanged: {current}");
                Ok(())
            }
        }
    }
}

fn switch(ctl: &Controller, mode: Mode) -> Result<()> {
    if !ctl.set_mode(mode) {
        bail!("failed to set mode to {mode}");
    }
    println!("{} current mode: {}", "✓".green().bold(), mode.as_str().bold());
    Ok(())
}
