//! # Trendwatch
//!
//! Compares what Korean news homepages are talking about today. Each
//! configured homepage is scraped once per day, its text reduced to nouns,
//! and the per-site noun counts cached to disk. An interactive terminal view
//! then shows the top words across the selected sites as a stacked bar
//! chart, restacked every time a site is toggled.
//!
//! ## Usage
//!
//! ```sh
//! trendwatch
//! trendwatch --sites sites.yaml --stopwords stopwords.txt --top 15
//! ```
//!
//! ## Architecture
//!
//! 1. **Cache**: evict artifacts from other days, then try today's
//! 2. **Acquisition** (cache miss only): fetch each homepage serially
//! 3. **Counting**: nouns → stopword filter → frequency table, saved as today's snapshot
//! 4. **Presentation**: rank the fixed vocabulary over the active sites on every toggle

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use trendwatch::cli::Cli;
use trendwatch::config::SiteConfig;
use trendwatch::pipeline::{self, PipelinePaths};
use trendwatch::scrapers::homepage::HttpFetcher;
use trendwatch::scrapers::retry::RetryFetch;
use trendwatch::tokenizer::HangulNounTokenizer;
use trendwatch::ui::App;
use trendwatch::utils::{ensure_writable_dir, today};

const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so the chart owns stdout) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("trendwatch starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration (fail fast) ----
    let site_config = match &args.sites {
        Some(path) => SiteConfig::from_file(path).await?,
        None => SiteConfig::default(),
    };
    let sites = site_config.resolve().inspect_err(|e| {
        error!(error = %e, "Invalid site configuration");
    })?;
    info!(count = sites.len(), "Sites configured");

    if let Err(e) = ensure_writable_dir(&args.cache_dir).await {
        error!(
            path = %args.cache_dir.display(),
            error = %e,
            "Cache directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Build or load today's snapshot ----
    let today = today();
    let fetcher = RetryFetch::new(
        HttpFetcher::new(Duration::from_secs(args.timeout_secs))?,
        args.retries,
        RETRY_BASE_DELAY,
    );
    let paths = PipelinePaths {
        cache_dir: &args.cache_dir,
        stopwords: &args.stopwords,
    };
    let snapshot = pipeline::build_or_load(&paths, today, &sites, &fetcher, &HangulNounTokenizer)
        .await
        .inspect_err(|e| error!(error = %e, "Could not obtain today's snapshot"))?;

    let elapsed = start_time.elapsed();
    info!(?elapsed, %today, sites = snapshot.len(), "Snapshot ready");

    // ---- Interactive chart ----
    App::new(sites, snapshot, args.top, !args.no_color).run().await?;

    info!(secs = start_time.elapsed().as_secs(), "Execution complete");
    Ok(())
}
