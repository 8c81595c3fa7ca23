//! `clashctl proxy` — list, pick or switch the selector's active proxy.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use clashctl_core::ProxyName;
use clashctl_daemon::Controller;

use crate::picker::{self, Menu, PAGE_SIZE};

#[derive(Args, Debug)]
pub struct ProxyArgs {
    /// Switch straight to this proxy instead of opening the picker.
    #[arg(conflicts_with_all = ["list", "page"])]
    pub name: Option<String>,

    /// Print the proxy group and exit.
    #[arg(long)]
    pub list: bool,

    /// Emit machine-readable JSON (with --list).
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Open the picker on this page, 10 proxies per page.
    #[arg(long)]
    pub page: Option<usize>,
}

#[derive(Serialize)]
struct ProxyListJson<'a> {
    current: Option<&'a ProxyName>,
    proxies: &'a [ProxyName],
}

#[derive(Tabled)]
struct ProxyRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "proxy")]
    name: String,
    #[tabled(rename = "current")]
    current: String,
}

impl ProxyArgs {
    pub fn run(self, ctl: &Controller) -> Result<()> {
        if let Some(name) = self.name {
            return switch(ctl, &ProxyName::from(name));
        }

        let proxies = ctl.get_proxies().context("failed to get proxies from clash")?;
        let current = ctl.get_proxy().ok();

        if self.list {
            if self.json {
                return print_json(&proxies, current.as_ref());
            }
            print_table(&proxies, current.as_ref());
            return Ok(());
        }

        if proxies.is_empty() {
            println!("No proxies available.");
            return Ok(());
        }

        let current_idx = current
            .as_ref()
            .and_then(|now| proxies.iter().position(|p| p == now));
        let labels = proxies.iter().map(ToString::to_string).collect();
        let mut menu = Menu::new(labels, current_idx);
        if let Some(page) = self.page {
            let pages = proxies.len().div_ceil(PAGE_SIZE);
            menu = menu
                .on_page(page)
                .with_context(|| format!("invalid page {page}; expected 1..={pages}"))?;
        }

        match picker::pick(menu).context("failed to run the proxy picker")? {
            Some(idx) => switch(ctl, &proxies[idx]),
            None => {
                println!("No proxy selected.");
                Ok(())
            }
        }
    }
}

fn switch(ctl: &Controller, name: &ProxyName) -> Result<()> {
    if !ctl.set_proxy(name) {
        bail!("failed to set proxy to '{name}'");
    }
    println!("{} current proxy: {}", "✓".green().bold(), name.as_str().bold());
    Ok(())
}

fn print_json(proxies: &[ProxyName], current: Option<&ProxyName>) -> Result<()> {
    let payload = ProxyListJson { current, proxies };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize proxy JSON")?
    );
    Ok(())
}

fn print_table(proxies: &[ProxyName], current: Option<&ProxyName>) {
    if proxies.is_empty() {
        println!("No proxies available.");
        return;
    }

    let rows: Vec<ProxyRow> = proxies
        .iter()
        .enumerate()
        .map(|(index, name)| ProxyRow {
            index,
            name: name.to_string(),
            current: if Some(name) == current {
                "●".green().bold().to_string()
            } else {
                String::new()
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
