//! The export run: login, fetch, resolve, write, logout.
//!
//! Phases run strictly in sequence and every call blocks. All rows are
//! rendered in memory before the output file is created, so a failure in
//! any phase up to the write leaves no partial report behind. Logout is
//! best effort and never fails the run.

use crate::config::ExportConfig;
use actiondump_core::EventSource;
use actiondump_report::{lookup, render_all, write_csv_file};
use actiondump_rpc::{AuthToken, RpcClient, Transport};
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Login,
    Fetch,
    Resolve,
    Render,
    Write,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::Fetch => "fetching trigger actions",
            Self::Resolve => "resolving identifiers",
            Self::Render => "rendering rows",
            Self::Write => "writing the CSV file",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The server has no trigger actions; no file was written.
    NoActions,
    Written { rows: usize, path: PathBuf },
}

fn failed(phase: ExportPhase) -> String {
    format!("export failed during {phase}")
}

pub fn run<T: Transport>(
    rpc: &RpcClient<T>,
    config: &ExportConfig,
    output: &Path,
) -> Result<ExportOutcome> {
    info!(url = %config.api_url, user = %config.username, "logging in");
    let token = rpc
        .login(&config.username, &config.password)
        .with_context(|| failed(ExportPhase::Login))?;
    info!("login OK");

    let outcome = export(rpc, &token, output);

    match rpc.logout(&token) {
        Ok(()) => info!("logged out"),
        Err(e) => warn!(error = %e, "logout failed (ignored)"),
    }
    outcome
}

fn export<T: Transport>(
    rpc: &RpcClient<T>,
    token: &AuthToken,
    output: &Path,
) -> Result<ExportOutcome> {
    info!("fetching trigger actions (eventsource = 0)");
    let actions = rpc
        .fetch_actions(token, &EventSource::Trigger)
        .with_context(|| failed(ExportPhase::Fetch))?;
    info!(count = actions.len(), "trigger actions fetched");

    if actions.is_empty() {
        info!("no trigger actions found, nothing to write");
        return Ok(ExportOutcome::NoActions);
    }

    info!("building lookup tables (host groups, hosts, templates, triggers, users, user groups, media types)");
    let tables = lookup::build(&actions, rpc, token).with_context(|| failed(ExportPhase::Resolve))?;
    let rows = render_all(&actions, &tables).with_context(|| failed(ExportPhase::Render))?;

    info!(path = %output.display(), "writing CSV");
    write_csv_file(&rows, output)
        .with_context(|| format!("{}: {}", failed(ExportPhase::Write), output.display()))?;
    info!(rows = rows.len(), path = %output.display(), "export complete");

    Ok(ExportOutcome::Written {
        rows: rows.len(),
        path: output.to_path_buf(),
    })
}
