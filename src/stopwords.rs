//! Stopword filtering.
//!
//! The stopword list is a UTF-8 file with one term per line. It is optional:
//! when the file does not exist the pipeline continues with an empty set and
//! nothing is excluded beyond the minimum-length rule.

use std::collections::HashSet;
use std::error::Error;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Tokens shorter than this many characters are always dropped.
pub const MIN_WORD_CHARS: usize = 2;

/// Load the stopword set from `path`.
///
/// Lines are trimmed; blank lines are skipped. A missing file yields an empty
/// set and a warning. Any other read failure is returned.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Result<HashSet<String>, Box<dyn Error>> {
    match fs::read_to_string(path).await {
        Ok(text) => {
            let terms = parse(&text);
            info!(count = terms.len(), "Loaded stopwords");
            Ok(terms)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Stopword file not found; continuing without stopwords");
            Ok(HashSet::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn parse(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep tokens of at least [`MIN_WORD_CHARS`] characters that are not stopwords.
///
/// Relative order and duplicates are preserved.
pub fn apply<I>(tokens: I, stopterms: &HashSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    tokens
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_WORD_CHARS && !stopterms.contains(t))
        .collect()
}
