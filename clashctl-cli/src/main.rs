//! clashctl — supervise a local clash daemon and drive its control API.
//!
//! # Usage
//!
//! ```text
//! clashctl start|stop|reload|ping
//! clashctl update <url>
//! clashctl proxy [name] [--list [--json]] [--page <n>]
//! clashctl mode [direct|proxies]
//! clashctl --log-file <command>
//! ```

mod commands;
mod picker;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use clashctl_core::DaemonConfig;
use clashctl_daemon::{logging, Controller};
use commands::{mode::ModeArgs, proxy::ProxyArgs, update::UpdateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "clashctl",
    version,
    about = "Start, stop, update and steer a local clash daemon",
    long_about = None,
)]
struct Cli {
    /// Append logs to ~/clashctl/clashctl.log instead of stderr.
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Restart the daemon and wait until it routes traffic.
    Start,
    /// Kill every daemon process started from the install.
    Stop,
    /// Stop then start the daemon.
    Reload,
    /// Check that traffic flows through the daemon's proxy port.
    Ping,
    /// Download a new config, swap it in and validate it.
    Update(UpdateArgs),
    /// Show or switch the active proxy.
    Proxy(ProxyArgs),
    /// Show or switch the routing mode.
    Mode(ModeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DaemonConfig::discover().context("failed to load clashctl configuration")?;
    let own_log = cli.log_file.then(|| config.own_log.clone());
    logging::init(own_log.as_deref())
        .with_context(|| format!("failed to open log file {}", config.own_log.display()))?;

    let ctl = Controller::new(config);
    match cli.command {
        Commands::Start => commands::lifecycle::start(&ctl),
        Commands::Stop => commands::lifecycle::stop(&ctl),
        Commands::Reload => commands::lifecycle::reload(&ctl),
        Commands::Ping => commands::lifecycle::ping(&ctl),
        Commands::Update(args) => args.run(&ctl),
        Commands::Proxy(args) => args.run(&ctl),
        Commands::Mode(args) => args.run(&ctl),
    }
}
