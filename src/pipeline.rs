//! Startup control flow: reuse today's snapshot or build it.
//!
//! 1. Open the cache directory and evict artifacts from other days.
//! 2. Load today's artifact; if present, check it covers every configured
//!    site and return it.
//! 3. Otherwise load stopwords, then for each site in order: fetch text,
//!    extract nouns, filter, count. Save the snapshot and return it.
//!
//! A second call on the same day is served from the cache and never fetches.

use crate::cache::{CacheError, CacheStore};
use crate::config::Site;
use crate::frequency;
use crate::models::{FrequencyTable, Snapshot};
use crate::scrapers::{FetchText, fetch_text};
use crate::stopwords;
use crate::tokenizer::NounTokenizer;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Where the pipeline reads and writes its files.
#[derive(Debug, Clone)]
pub struct PipelinePaths<'a> {
    pub cache_dir: &'a Path,
    pub stopwords: &'a Path,
}

/// Return today's snapshot, from cache when possible.
///
/// Stale artifacts are evicted first. On a cache hit nothing is fetched; on a
/// miss every site is fetched serially, counted, and the result saved as
/// today's artifact.
///
/// # Arguments
///
/// * `paths` - Cache directory and stopword file.
/// * `today` - Local calendar day the snapshot belongs to.
/// * `sites` - Configured sites, in display order.
/// * `fetcher` - Source of page text; failures yield an empty table.
/// * `tokenizer` - Noun extractor applied to each page.
///
/// # Returns
///
/// A snapshot with one table per configured site.
///
/// # Errors
///
/// Any [`CacheError`] from opening, loading or saving the cache, including
/// [`CacheError::MissingSite`] when today's artifact lacks a configured site.
/// Also a stopword file that exists but cannot be read.
#[instrument(level = "info", skip_all, fields(%today, cache_dir = %paths.cache_dir.display()))]
pub async fn build_or_load<F, T>(
    paths: &PipelinePaths<'_>,
    today: NaiveDate,
    sites: &[Site],
    fetcher: &F,
    tokenizer: &T,
) -> Result<Snapshot, Box<dyn Error>>
where
    F: FetchText,
    T: NounTokenizer,
{
    let mut store = CacheStore::open(paths.cache_dir).await?;
    store.evict_stale(today).await;

    if let Some(snapshot) = store.load(today).await? {
        ensure_covers(&store, today, &snapshot, sites)?;
        info!(sites = snapshot.len(), "Using cached snapshot");
        return Ok(snapshot);
    }

    let stopterms = stopwords::load(paths.stopwords).await?;
    let snapshot = build_snapshot(sites, fetcher, tokenizer, &stopterms).await;
    store.save(today, &snapshot).await?;
    Ok(snapshot)
}

/// Acquire and count every site, one after another.
pub async fn build_snapshot<F, T>(
    sites: &[Site],
    fetcher: &F,
    tokenizer: &T,
    stopterms: &HashSet<String>,
) -> Snapshot
where
    F: FetchText,
    T: NounTokenizer,
{
    stream::iter(sites)
        .then(|site| async move {
            info!(site = %site.name, url = %site.url, "Collecting site");
            let text = fetch_text(fetcher, site.url.as_str()).await;
            debug!(site = %site.name, preview = %truncate_for_log(&text, 120), "Page text");
            let table = site_table(&text, tokenizer, stopterms);
            info!(
                site = %site.name,
                words = table.len(),
                occurrences = table.total(),
                "Counted nouns"
            );
            (site.name.clone(), table)
        })
        .collect()
        .await
}

/// Nouns of `text`, filtered and counted.
pub fn site_table<T: NounTokenizer>(
    text: &str,
    tokenizer: &T,
    stopterms: &HashSet<String>,
) -> FrequencyTable {
    let nouns = tokenizer.nouns(text);
    frequency::build(stopwords::apply(nouns, stopterms))
}

fn ensure_covers(
    store: &CacheStore,
    today: NaiveDate,
    snapshot: &Snapshot,
    sites: &[Site],
) -> Result<(), CacheError> {
    let cached: HashSet<&str> = snapshot.sites().collect();
    match sites.iter().find(|s| !cached.contains(s.name.as_str())) {
        None => Ok(()),
        Some(missing) => Err(CacheError::MissingSite {
            path: store
                .index()
                .get(today)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| store.dir().to_path_buf()),
            site: missing.name.clone(),
        }),
    }
}
