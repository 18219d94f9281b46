//! CLI for running one backfill batch outside the HTTP server
//!
//! Uses the same environment as the server and prints the batch outcome
//! as JSON on stdout.

use anyhow::{bail, Context, Result};
use clap::Parser;
use link_metadata::{backfill_links, BackfillConfig, BackfillError, BackfillOptions};
use server_core::config::Config;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "backfill")]
#[command(about = "Fill in missing link titles and summaries")]
struct Cli {
    /// Maximum number of blank-title links to process
    #[arg(long)]
    limit: Option<usize>,

    /// Process exactly this link, even if it already has a title
    #[arg(long)]
    link_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,link_metadata=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let Some(store) = config.connect_store().await? else {
        bail!("SUPABASE_URL or SB_PUBLISHABLE_KEY not configured");
    };
    let extractor = config.extractor()?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling batch");
            trigger.cancel();
        }
    });

    let options = BackfillOptions {
        link_id: cli.link_id,
        limit: cli.limit,
    };

    let outcome = match backfill_links(
        store.as_ref(),
        &extractor,
        &options,
        &BackfillConfig::default(),
        &cancel,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(BackfillError::Cancelled) => bail!("Backfill cancelled"),
        Err(e) => return Err(e).context("Backfill failed"),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
    );

    Ok(())
}
