#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Negotiate-authenticated RPC service gateway.

mod config;
mod demo;
mod logging;
mod wiring;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use mimalloc::MiMalloc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::logging::LogFormat;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Service gateway HTTP server.
#[derive(Parser, Debug)]
#[command(name = "svcgate-server", version, about = "Negotiate-authenticated RPC service gateway")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format)?;

    let cfg = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    info!(config = ?cfg, "Effective configuration");

    let gateway = wiring::build_gateway(&cfg)?;
    if cli.check {
        info!("Configuration is valid");
        return Ok(());
    }

    let listener = gateway.bind().await?;
    gateway.serve(listener, shutdown_signal()).await?;
    info!("svcgate-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["svcgate-server"]).unwrap();
        assert!(cli.config.is_none());
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(!cli.check);
    }

    #[test]
    fn cli_accepts_json_logs_and_a_config_path() {
        let cli = Cli::try_parse_from([
            "svcgate-server",
            "--config",
            "config/svcgate.yaml",
            "--log-format",
            "json",
            "--log-level",
            "debug",
            "--check",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("config/svcgate.yaml")));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.check);
    }
}
