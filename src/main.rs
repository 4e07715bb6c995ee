//! runmatch command-line entry point.
//!
//! ```text
//! runmatch score <profile_a.json> <profile_b.json>
//! runmatch replay <script.json>
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::sync::Arc;

use anyhow::{Context, bail};
use mockable::{Clock, DefaultClock};
use tracing_subscriber::EnvFilter;

use runmatch_core::config::RunmatchConfig;
use runmatch_core::domain::{ManualClock, SharedClock};
use runmatch_core::replay::{ReplayCommand, run_script};
use runmatch_core::service::SwipeService;
use runmatch_core::similarity::{ProfileRecord, SimilarityScorer};

const USAGE: &str = "usage: runmatch score <a.json> <b.json> | runmatch replay <script.json>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunmatchConfig::from_env().context("loading configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("score") => {
            let (Some(a), Some(b)) = (args.next(), args.next()) else {
                bail!(USAGE);
            };
            let profile_a: ProfileRecord = read_json(&a).await?;
            let profile_b: ProfileRecord = read_json(&b).await?;

            let scorer = SimilarityScorer::new(config.similarity);
            let report = scorer.is_similar(&profile_a, &profile_b);
            tracing::info!(score = report.score, similar = report.similar, "profiles compared");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some("replay") => {
            let Some(path) = args.next() else {
                bail!(USAGE);
            };
            let commands: Vec<ReplayCommand> = read_json(&path).await?;
            tracing::info!(commands = commands.len(), path = %path, "replaying script");

            let clock = Arc::new(ManualClock::new(DefaultClock.utc()));
            let service =
                SwipeService::in_memory(Arc::clone(&clock) as SharedClock, config.limits);
            for outcome in run_script(&service, &clock, commands).await {
                println!("{}", serde_json::to_string(&outcome)?);
            }
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))
}
