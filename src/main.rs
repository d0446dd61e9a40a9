//! Daily realtor digest: binary entrypoint.
//! Loads configuration, checks every configured location once, prints the
//! report and emails it unless `--dry` is given.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use realtor_digest::ingest::providers::realty::RealtyProvider;
use realtor_digest::{Config, EmailSender, Notifier};

#[derive(Parser, Debug)]
#[command(
    name = "realtor-digest",
    about = "Email a digest of real-estate listings posted in the last day",
    version
)]
struct Cli {
    /// Run without sending email (the report is still printed)
    #[arg(long)]
    dry: bool,
    /// Config file (JSON, or TOML by extension); overrides REALTOR_CONFIG_PATH
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Logs go to stderr so stdout carries only the report.
/// `RUST_LOG` controls filtering; `REALTOR_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("realtor_digest=info,warn"));

    let json = std::env::var("REALTOR_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // Load .env before the log filter reads RUST_LOG.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = match Config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            eprintln!("configuration error: {e}");
            return ExitCode::from(2);
        }
    };
    tracing::info!(
        locations = cfg.locations.len(),
        key_len = cfg.api_key.len(),
        dry = cli.dry,
        "config loaded"
    );

    let provider = match RealtyProvider::from_config(&cfg) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "could not build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let sender = if cli.dry {
        None
    } else {
        match EmailSender::from_config(&cfg) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::error!(error = %e, "unable to prepare email transport");
                None
            }
        }
    };
    let notifier = sender.as_ref().map(|s| s as &dyn Notifier);

    let mut stdout = std::io::stdout().lock();
    realtor_digest::run(
        &cfg,
        &provider,
        cli.dry,
        notifier,
        chrono::Utc::now(),
        &mut stdout,
    )
    .await;

    ExitCode::SUCCESS
}
