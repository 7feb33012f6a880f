//! Command-line link checker.
//!
//! Runs the same verdict pipeline as the HTTP service, without cache or
//! server, and can list stored history.
//!
//! # Usage
//!
//! ```bash
//! # Check a URL
//! cargo run --bin scan -- check https://example.com/login
//!
//! # Machine-readable output (same envelope as POST /api/linkcheck)
//! cargo run --bin scan -- check https://example.com --json
//!
//! # Show configured providers
//! cargo run --bin scan -- providers
//!
//! # Recent checks of a caller (requires DATABASE_URL)
//! cargo run --bin scan -- history user-1 --limit 10
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `VIRUSTOTAL_API_KEY`, `SAFE_BROWSING_API_KEY`, timeouts,
//! and `DATABASE_URL` for `history`.
//!
//! Exit code is `0` for `safe`, `1` for `warning`, `2` for `danger`.

use linkcheck::api::dto::linkcheck::LinkCheckResponse;
use linkcheck::application::services::{HistoryService, LinkCheckService};
use linkcheck::config::{self, Config};
use linkcheck::domain::entities::{CallerIdentity, ScanSource, Verdict, VerdictStatus};
use linkcheck::infrastructure::cache::NullCache;
use linkcheck::infrastructure::persistence::{NullScanRecordRepository, PgScanRecordRepository};
use linkcheck::server::{build_aggregator, build_providers};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::process::ExitCode;
use std::sync::Arc;

/// Check links against reputation services.
#[derive(Parser)]
#[command(name = "scan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one URL
    Check {
        /// URL to check (http or https)
        url: String,

        /// Print the JSON envelope instead of a summary
        #[arg(long)]
        json: bool,

        /// Mark the check as coming from a QR code
        #[arg(long)]
        qr: bool,
    },

    /// List configured providers in priority order
    Providers,

    /// Show recent checks of a caller
    History {
        /// Caller identity
        owner: String,

        /// Number of records (1-100)
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Check { url, json, qr } => check(&config, &url, json, qr).await,
        Commands::Providers => {
            list_providers(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::History { owner, limit } => {
            history(&config, owner, limit).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn check(config: &Config, url: &str, json: bool, qr: bool) -> Result<ExitCode> {
    let service = LinkCheckService::new(
        Arc::new(build_aggregator(config)?),
        Arc::new(NullCache::new()),
        Arc::new(NullScanRecordRepository::new()),
        None,
    );

    let source = if qr { ScanSource::Qr } else { ScanSource::Url };
    let verdict = service
        .check(url, None, source)
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.kind()))?;

    let code = exit_code(verdict.status);

    if json {
        let body = serde_json::to_string_pretty(&LinkCheckResponse::from(verdict))?;
        println!("{}", body);
    } else {
        print_verdict(&verdict);
    }

    Ok(code)
}

fn exit_code(status: VerdictStatus) -> ExitCode {
    match status {
        VerdictStatus::Safe => ExitCode::SUCCESS,
        VerdictStatus::Warning => ExitCode::from(1),
        VerdictStatus::Danger => ExitCode::from(2),
    }
}

fn paint_status(status: VerdictStatus) -> ColoredString {
    let label = status.as_str().to_uppercase();
    match status {
        VerdictStatus::Safe => label.green().bold(),
        VerdictStatus::Warning => label.yellow().bold(),
        VerdictStatus::Danger => label.red().bold(),
    }
}

fn print_verdict(verdict: &Verdict) {
    println!("{}", verdict.url.bright_blue().bold());
    println!(
        "  {} {}  score {}",
        "Verdict:".bold(),
        paint_status(verdict.status),
        verdict.score
    );
    println!("  {} {}", "Decided by:".bold(), verdict.provider_used);
    println!(
        "  {} {}/{} providers answered",
        "Coverage:".bold(),
        verdict.providers_answered,
        verdict.providers_consulted
    );
    println!();
    for line in &verdict.explanation {
        println!("  • {}", line.dimmed());
    }
}

fn list_providers(config: &Config) -> Result<()> {
    let providers = build_providers(config)?;

    if providers.is_empty() {
        println!(
            "{}",
            "No providers configured. Set VIRUSTOTAL_API_KEY or SAFE_BROWSING_API_KEY.".yellow()
        );
        return Ok(());
    }

    println!("{}", "Providers (priority order)".bright_blue().bold());
    for (rank, provider) in providers.iter().enumerate() {
        println!("  {}. {}", rank + 1, provider.name().green());
    }
    println!();
    println!(
        "  provider timeout {} ms, aggregate timeout {} ms",
        config.provider_timeout_ms, config.aggregate_timeout_ms
    );

    Ok(())
}

async fn history(config: &Config, owner: String, limit: i64) -> Result<()> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to read history")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let service = HistoryService::new(Arc::new(PgScanRecordRepository::new(Arc::new(pool))));
    let records = service
        .recent(&CallerIdentity::new(owner.clone()), Some(limit))
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if records.is_empty() {
        println!("{}", format!("No checks recorded for {}", owner).yellow());
        return Ok(());
    }

    println!("{}", format!("Recent checks for {}", owner).bright_blue().bold());
    for record in records {
        println!(
            "  {}  {:<8} {:>3}  {:<3}  {}",
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            paint_status(record.status),
            record.score,
            record.source,
            record.url
        );
    }

    Ok(())
}
