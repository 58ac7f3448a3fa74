//! CLI for actiondump.
//!
//! Exports the trigger actions of a Zabbix server into a detailed CSV
//! report: identity and status columns, human-readable conditions and
//! operations, and the raw JSON of filter and operation lists. Connection
//! settings come from `ZABBIX_*` environment variables; progress is logged
//! to stderr (`RUST_LOG` adjusts verbosity).

mod config;
mod export;

use actiondump_rpc::{HttpTransport, RpcClient};
use anyhow::{Context, Result};
use clap::Parser;
use config::ExportConfig;
use export::ExportOutcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "zabbix_trigger_actions_detailed.csv";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output CSV file
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ExportConfig::from_env().context("invalid configuration")?;

    let transport = HttpTransport::new(config.api_url.clone(), &config.transport_options())
        .context("failed to set up the HTTP client")?;
    let rpc = RpcClient::new(transport);

    match export::run(&rpc, &config, &cli.output)? {
        ExportOutcome::NoActions => println!("No trigger actions found, nothing exported."),
        ExportOutcome::Written { rows, path } => {
            println!("Exported {rows} trigger actions to {}", path.display());
        }
    }

    Ok(())
}
