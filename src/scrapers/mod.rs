//! Text acquisition from news homepages.
//!
//! Each configured site is fetched once per day, serially and in configured
//! order. Acquisition is best-effort: a site that cannot be fetched
//! contributes an empty text, which becomes an empty frequency table, and the
//! run continues.
//!
//! # Layers
//!
//! | Type | Role |
//! |------|------|
//! | [`FetchText`] | async URL → plain text |
//! | [`homepage::HttpFetcher`] | `reqwest` GET with timeout and User-Agent, `scraper` text extraction |
//! | [`retry::RetryFetch`] | bounded exponential backoff around any fetcher |
//! | [`fetch_text`] | folds a final error into an empty string |

pub mod homepage;
pub mod retry;

use std::error::Error;
use tracing::{error, info, instrument};

/// Async retrieval of a page's plain text.
pub trait FetchText {
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Fetch `url`, turning any failure into an empty text.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_text<F: FetchText>(fetcher: &F, url: &str) -> String {
    match fetcher.fetch(url).await {
        Ok(text) => {
            info!(chars = text.chars().count(), "Fetched page text");
            text
        }
        Err(e) => {
            error!(error = %e, "Fetch failed; using empty text");
            String::new()
        }
    }
}
