//! Quippy Daemon - system scan and troubleshooting assistant
//!
//! Serves the scan and chat endpoints used by quippyctl and the web front end.

use anyhow::{Context, Result};
use clap::Parser;
use quippy_common::{QuippyConfig, ScannerMode};
use quippyd::{server, startup};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "quippyd")]
#[command(about = "The Quippy - troubleshooting assistant daemon", long_about = None)]
#[command(version)]
struct Args {
    /// Config file (defaults: /etc/quippy/config.toml, ~/.config/quippy/config.toml)
    #[arg(long, env = "QUIPPY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides [server] bind
    #[arg(long)]
    bind: Option<String>,

    /// Use simulated scan data instead of reading the host
    #[arg(long)]
    simulate: bool,

    /// Never call the language model; answer from the keyword catalog only
    #[arg(long)]
    offline: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = QuippyConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if args.simulate {
        config.scanner.mode = ScannerMode::Simulated;
    }
    if args.offline {
        config.llm.enabled = false;
    }
    if args.print_config {
        print!("{}", config.to_toml().context("Failed to render config")?);
        return Ok(());
    }

    startup::init_logging(&config.log.level);
    info!("Quippy Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let state = match startup::build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("[FATAL] {}", e);
            return Err(e);
        }
    };

    server::run(state, &config.server.bind).await
}
