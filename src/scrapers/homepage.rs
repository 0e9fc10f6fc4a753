//! Homepage fetcher.
//!
//! Downloads a page with a browser-like User-Agent and a fixed timeout, then
//! flattens the HTML to the visible text: every text node outside `script`,
//! `style` and `noscript`, trimmed and joined with single spaces.

use super::FetchText;
use reqwest::Client;
use scraper::Html;
use scraper::node::Node;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// `reqwest`-backed [`FetchText`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchText for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        // homepages are read as UTF-8 whatever charset they declare
        let html = String::from_utf8_lossy(&bytes);
        debug!(bytes = bytes.len(), "Downloaded page");
        Ok(extract_text(&html))
    }
}

/// Visible text of an HTML document.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }

    pieces.join(" ")
}
