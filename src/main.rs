use anyhow::Result;
use fplscraper::{config::Config, fetch::Fetcher, flow};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config + client ──────────────────────────────────────────
    let cfg = Config::load()?;
    let name = env::args()
        .nth(1)
        .unwrap_or_else(|| flow::DEFAULT_PLAYER.to_string());
    let fetcher = Fetcher::new(&cfg.api)?;
    info!(base = %fetcher.base_url(), player = %name, "configured");

    // ─── 3) season data, player lookup, gameweeks ────────────────────
    let (_, summary) = flow::run(&fetcher, &name, &cfg, |msg| println!("{}", msg)).await?;
    if let Some(rows) = summary.merged_rows {
        println!(
            "merged {} rows from {} gameweeks ({} skipped)",
            rows,
            summary.written.len(),
            summary.skipped.len()
        );
    }

    info!("all done");
    Ok(())
}
