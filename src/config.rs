//! Site configuration.
//!
//! The site list and the site → color mapping are kept as two parallel
//! structures, the way they are written in a configuration file:
//!
//! ```yaml
//! sites:
//!   - name: 네이버뉴스
//!     url: https://news.naver.com/
//! colors:
//!   네이버뉴스: "#03C75A"
//! ```
//!
//! [`SiteConfig::resolve`] joins them into [`Site`] records and fails fast on
//! any inconsistency. A site without a color is an error; there is no default
//! color, since an invisible legend entry would misrepresent the chart.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};
use url::Url;

/// A configured news homepage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub url: Url,
    pub color: Rgb,
}

/// A display color parsed from `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    NoSites,
    DuplicateSite(String),
    MissingColor(String),
    BadColor { site: String, value: String },
    BadUrl { site: String, error: url::ParseError },
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoSites => write!(f, "no sites configured"),
            ConfigError::DuplicateSite(name) => write!(f, "site '{name}' is configured twice"),
            ConfigError::MissingColor(name) => write!(f, "site '{name}' has no display color"),
            ConfigError::BadColor { site, value } => {
                write!(f, "site '{site}' has color '{value}', expected #RRGGBB")
            }
            ConfigError::BadUrl { site, error } => {
                write!(f, "site '{site}' has an invalid url: {error}")
            }
            ConfigError::Io(e) => write!(f, "could not read site config: {e}"),
            ConfigError::Yaml(e) => write!(f, "could not parse site config: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::BadUrl { error, .. } => Some(error),
            ConfigError::Io(e) => Some(e),
            ConfigError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    pub name: String,
    pub url: String,
}

/// Unvalidated configuration as written by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub sites: Vec<SiteEntry>,
    pub colors: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let entry = |name: &str, url: &str| SiteEntry {
            name: name.to_string(),
            url: url.to_string(),
        };
        let sites = vec![
            entry("네이버뉴스", "https://news.naver.com/"),
            entry("조선일보", "https://www.chosun.com/"),
            entry("다음뉴스", "https://news.daum.net/"),
            entry("연합뉴스", "https://www.yna.co.kr/"),
            entry("KBS", "https://news.kbs.co.kr/news/pc/main/main.html"),
        ];
        let colors = [
            ("네이버뉴스", "#03C75A"),
            ("조선일보", "#C8102E"),
            ("다음뉴스", "#FFB800"),
            ("연합뉴스", "#005BAC"),
            ("KBS", "#6A8DFF"),
        ]
        .into_iter()
        .map(|(n, c)| (n.to_string(), c.to_string()))
        .collect();
        Self { sites, colors }
    }
}

impl SiteConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(ConfigError::Yaml)
    }

    #[instrument(level = "info")]
    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path).await.map_err(ConfigError::Io)?;
        let config = Self::from_yaml(&text)?;
        info!(sites = config.sites.len(), "Loaded site config");
        Ok(config)
    }

    /// Validate and join sites with their colors, keeping configured order.
    pub fn resolve(&self) -> Result<Vec<Site>, ConfigError> {
        if self.sites.is_empty() {
            return Err(ConfigError::NoSites);
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(self.sites.len());
        for entry in &self.sites {
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::DuplicateSite(entry.name.clone()));
            }
            let raw_color = self
                .colors
                .get(&entry.name)
                .ok_or_else(|| ConfigError::MissingColor(entry.name.clone()))?;
            let color = Rgb::parse_hex(raw_color).ok_or_else(|| ConfigError::BadColor {
                site: entry.name.clone(),
                value: raw_color.clone(),
            })?;
            let url = Url::parse(&entry.url).map_err(|error| ConfigError::BadUrl {
                site: entry.name.clone(),
                error,
            })?;
            debug!(site = %entry.name, %url, "Resolved site");
            resolved.push(Site {
                name: entry.name.clone(),
                url,
                color,
            });
        }
        Ok(resolved)
    }
}
