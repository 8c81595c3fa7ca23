//! `clashctl start|stop|reload|ping`.

use anyhow::{bail, Result};
use colored::Colorize;

use clashctl_daemon::Controller;

/// Always goes through a full stop first, so a stale daemon never lingers.
pub fn start(ctl: &Controller) -> Result<()> {
    println!("{} starting clash", "→".cyan());
    if !ctl.reload() {
        bail!(
            "failed to start clash; see {}",
            ctl.config().daemon_log.display()
        );
    }
    println!("{} clash is now available", "✓".green().bold());
    Ok(())
}

pub fn stop(ctl: &Controller) -> Result<()> {
    ctl.stop();
    println!("{} stopped clash", "✓".green().bold());
    Ok(())
}

pub fn reload(ctl: &Controller) -> Result<()> {
    if !ctl.reload() {
        bail!(
            "failed to reload clash; see {}",
            ctl.config().daemon_log.display()
        );
    }
    println!("{} reloaded clash", "✓".green().bold());
    Ok(())
}

pub fn ping(ctl: &Controller) -> Result<()> {
    if !ctl.ping() {
        bail!("clash is not available");
    }
    println!("{} clash is available", "✓".green().bold());
    Ok(())
}
