//! `clashctl update <url>` — replace the active config from a subscription.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use clashctl_daemon::Controller;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Subscription URL; one pair of surrounding quotes is stripped.
    pub url: String,
}

impl UpdateArgs {
    pub fn run(self, ctl: &Controller) -> Result<()> {
        println!("{} updating config from {}", "→".cyan(), self.url);
        if !ctl.update(&self.url) {
            bail!(
                "failed to update config from {}; the previous config is kept",
                self.url
            );
        }
        println!(
            "{} updated {}",
            "✓".green().bold(),
            ctl.config().config_file.display()
        );
        println!(
            "{} clash is stopped; run `clashctl start` to bring it back",
            "!".yellow().bold()
        );
        Ok(())
    }
}
