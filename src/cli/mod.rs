//! Command-line interface
//!
//! Every command reads `--config` (and `--params` where the stage needs it) fresh.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::config::{AppConfig, Params};
use crate::pipeline::Pipeline;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString { s.truecolor(100, 210, 120) }
fn bad(s: &str) -> ColoredString { s.truecolor(230, 110, 100) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "datascience")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tabular regression workflow: data, train, diagnose, serve")]
pub struct Cli {
    /// Configuration file (paths, target, separator)
    #[arg(long, global = true, default_value = "config/config.yaml")]
    pub config: PathBuf,

    /// Run parameters (split, scaler, model)
    #[arg(long, global = true, default_value = "params.yaml")]
    pub params: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest, validate and split the raw data
    Data,

    /// Run the data chain, then train and evaluate
    Train,

    /// Render diagnostic charts and the report for the current model
    Diagnose,

    /// Serve predictions over HTTP
    Serve {
        /// Bind address (default: API_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port (default: API_PORT or 8000)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a ready-to-POST prediction body from the raw data
    Sample {
        /// Number of raw rows to include
        #[arg(long, default_value = "1")]
        rows: usize,
    },

    /// Check required columns, target range and duplicate rows
    Check,
}

fn pipeline(cli: &Cli) -> anyhow::Result<Pipeline> {
    Ok(Pipeline::load(&cli.config, &cli.params)?)
}

/// Stages that never read params run on defaults
fn config_only(cli: &Cli) -> anyhow::Result<Pipeline> {
    Ok(Pipeline::new(AppConfig::load(&cli.config)?, Params::default()))
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_data(cli: &Cli) -> anyhow::Result<()> {
    pipeline(cli)?.run_data()?;
    println!("Data pipeline complete.");
    Ok(())
}

pub fn cmd_train(cli: &Cli) -> anyhow::Result<()> {
    let (_, metrics_path) = pipeline(cli)?.run_train()?;
    println!("Training pipeline complete. Metrics at: {}", metrics_path.display());
    Ok(())
}

pub fn cmd_diagnose(cli: &Cli) -> anyhow::Result<()> {
    let artifacts = config_only(cli)?.run_diagnostics()?;
    section("Diagnostics");
    for path in artifacts {
        println!("  {} {}", ok("✓"), path.display());
    }
    println!();
    Ok(())
}

pub fn cmd_sample(cli: &Cli, rows: usize) -> anyhow::Result<()> {
    let payload = config_only(cli)?.sample_payload(rows)?;
    println!("{}", serde_json::to_string(&payload)?);
    Ok(())
}

/// Fails when any contract violation is found
pub fn cmd_check(cli: &Cli) -> anyhow::Result<()> {
    let report = config_only(cli)?.check()?;

    section("Data contract");
    println!("  {:<12} {}", muted("Rows"), report.rows);
    println!("  {:<12} {}", muted("Duplicates"), report.duplicate_rows);
    println!();

    if report.is_ok() {
        println!("  {} all checks passed", ok("✓"));
        println!();
        return Ok(());
    }
    for violation in &report.violations {
        println!("  {} {}", bad("✗"), violation);
    }
    println!();
    anyhow::bail!("{} data contract violation(s)", report.violations.len())
}

pub async fn cmd_serve(cli: &Cli, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let app_config = AppConfig::load(&cli.config)?;
    let server = ServerConfig::with_overrides(host, port);

    section("datascience server");
    println!("  {:<8} http://{}:{}/health", muted("Health"), server.host, server.port);
    println!("  {:<8} http://{}:{}/predict", muted("Predict"), server.host, server.port);
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(server, app_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["datascience", "data"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config/config.yaml"));
        assert_eq!(cli.params, PathBuf::from("params.yaml"));
        assert!(matches!(cli.command, Commands::Data));
    }

    #[test]
    fn test_serve_flags_and_global_config() {
        let cli = Cli::try_parse_from([
            "datascience",
            "serve",
            "--port",
            "9001",
            "--config",
            "other.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.yaml"));
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9001));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_sample_rows() {
        let cli = Cli::try_parse_from(["datascience", "sample", "--rows", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Sample { rows: 3 }));
    }
}
