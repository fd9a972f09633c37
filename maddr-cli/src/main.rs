// maddr: print multiaddrs — either one parsed from the command line, or
// every local interface address plus the externally observed one.

mod compose;
mod config;
mod interfaces;
mod outbound;
mod output;

use std::io::Write;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use maddr_core::{Multiaddr, Registry};
use tracing_subscriber::EnvFilter;

use config::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "maddr", version, about)]
struct Cli {
    /// Multiaddr to display. When omitted, local addresses are discovered.
    addr: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Do not display loopback addresses.
    #[arg(long)]
    hide_loopback: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("MADDR_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load();
    if let Some(format) = cli.format {
        cfg.format = format;
    }
    if cli.hide_loopback {
        cfg.hide_loopback = true;
    }

    let registry = Registry::new();
    let addrs = match &cli.addr {
        Some(s) => match Multiaddr::parse(s, &registry) {
            Ok(addr) => vec![addr],
            Err(e) => return die(&e.to_string()),
        },
        None => {
            let local = match interfaces::list_local_addrs(&registry) {
                Ok(local) => local,
                Err(e) => return die(&e.to_string()),
            };
            let outbound = outbound::resolve_outbound_addr(&cfg, &registry);
            compose::assemble(local, outbound, cfg.hide_loopback)
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for addr in &addrs {
        if output::write_addr(&mut out, addr, cfg.format).is_err() {
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Print the error and usage to stderr, then exit non-zero.
fn die(msg: &str) -> ExitCode {
    eprintln!("error: {msg}");
    let _ = writeln!(std::io::stderr(), "{}", Cli::command().render_usage());
    ExitCode::FAILURE
}
