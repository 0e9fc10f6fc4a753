//! Command-line interface definitions.
//!
//! Every flag is optional. Running with no arguments uses the built-in site
//! list, `./cache` for snapshots and `./stopwords.txt` for stopwords.

use crate::aggregate::DEFAULT_TOP_N;
use clap::Parser;
use std::path::PathBuf;

/// Compare the most frequent nouns across Korean news homepages.
///
/// # Examples
///
/// ```sh
/// # Defaults: built-in sites, ./cache, ./stopwords.txt
/// trendwatch
///
/// # Custom site list and a wider ranking
/// trendwatch --sites sites.yaml --top 15
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the daily snapshot cache
    #[arg(long, default_value = "cache")]
    pub cache_dir: PathBuf,

    /// Stopword list, one term per line (optional file)
    #[arg(short, long, default_value = "stopwords.txt")]
    pub stopwords: PathBuf,

    /// YAML file replacing the built-in site list and colors
    #[arg(long)]
    pub sites: Option<PathBuf>,

    /// Number of words in the chart
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Extra attempts for a failed homepage fetch
    #[arg(long, default_value_t = 2)]
    pub retries: usize,

    /// Draw the chart without ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["trendwatch"]);
        assert_eq!(cli.cache_dir, PathBuf::from("cache"));
        assert_eq!(cli.stopwords, PathBuf::from("stopwords.txt"));
        assert!(cli.sites.is_none());
        assert_eq!(cli.top, 10);
        assert_eq!(cli.timeout_secs, 10);
        assert_eq!(cli.retries, 2);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "trendwatch",
            "--cache-dir",
            "/tmp/cache",
            "-s",
            "/tmp/stop.txt",
            "--sites",
            "sites.yaml",
            "-n",
            "5",
            "--no-color",
        ]);
        assert_eq!(cli.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(cli.stopwords, PathBuf::from("/tmp/stop.txt"));
        assert_eq!(cli.sites, Some(PathBuf::from("sites.yaml")));
        assert_eq!(cli.top, 5);
        assert!(cli.no_color);
    }
}
