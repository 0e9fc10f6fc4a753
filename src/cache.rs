//! Day-scoped snapshot cache.
//!
//! One JSON artifact per calendar day lives in the cache directory:
//!
//! ```text
//! cache/
//! └── 2026-10-18_site_freq.json   {"site": {"word": count}}
//! ```
//!
//! [`CacheStore::open`] scans the directory once and builds a [`CacheIndex`]
//! of day → artifact path. Everything afterwards works from that index:
//! [`CacheStore::evict_stale`] deletes every artifact whose day is not today,
//! [`CacheStore::load`] returns today's snapshot if there is one, and
//! [`CacheStore::save`] writes today's snapshot and records it.
//!
//! Temporary files left behind by an interrupted save
//! (`.2026-10-18_site_freq.json.tmp`) are indexed as leftovers and removed by
//! eviction whatever their day. Any other file in the directory is never
//! touched.

use crate::models::Snapshot;
use crate::stopwords::MIN_WORD_CHARS;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

const ARTIFACT_SUFFIX: &str = "_site_freq.json";
const TEMP_PREFIX: &str = ".";
const TEMP_SUFFIX: &str = ".tmp";
const DAY_FORMAT: &str = "%Y-%m-%d";

/// File name of the artifact for `day`, e.g. `2026-10-18_site_freq.json`.
pub fn artifact_name(day: NaiveDate) -> String {
    format!("{}{}", day.format(DAY_FORMAT), ARTIFACT_SUFFIX)
}

/// Day key embedded in an artifact file name, if the name is an artifact's.
pub fn day_key(file_name: &str) -> Option<NaiveDate> {
    let prefix = file_name.strip_suffix(ARTIFACT_SUFFIX)?;
    NaiveDate::parse_from_str(prefix, DAY_FORMAT).ok()
}

/// Name of the temporary file a save for `day` writes before renaming.
fn temp_name(day: NaiveDate) -> String {
    format!("{TEMP_PREFIX}{}{TEMP_SUFFIX}", artifact_name(day))
}

/// Day of a temporary file left by an interrupted save.
fn temp_day_key(file_name: &str) -> Option<NaiveDate> {
    file_name
        .strip_prefix(TEMP_PREFIX)?
        .strip_suffix(TEMP_SUFFIX)
        .and_then(day_key)
}

#[derive(Debug)]
pub enum CacheError {
    /// The artifact or directory could not be read or written.
    Io { path: PathBuf, source: std::io::Error },
    /// The artifact is not a `{site: {word: count}}` JSON object.
    Parse { path: PathBuf, source: serde_json::Error },
    /// The artifact parsed but holds data no pipeline run could produce.
    Invalid { path: PathBuf, reason: String },
    /// Today's artifact has no table for a configured site.
    MissingSite { path: PathBuf, site: String },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io { path, source } => {
                write!(f, "cache I/O failed for {}: {source}", path.display())
            }
            CacheError::Parse { path, source } => {
                write!(f, "cache artifact {} is malformed: {source}", path.display())
            }
            CacheError::Invalid { path, reason } => {
                write!(f, "cache artifact {} is invalid: {reason}", path.display())
            }
            CacheError::MissingSite { path, site } => write!(
                f,
                "cache artifact {} has no data for site '{site}' (delete it to rebuild)",
                path.display()
            ),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CacheError::Io { source, .. } => Some(source),
            CacheError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Day → artifact path for every recognized artifact in the cache directory,
/// plus any temporary files an interrupted save left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheIndex {
    entries: BTreeMap<NaiveDate, PathBuf>,
    leftovers: Vec<PathBuf>,
}

impl CacheIndex {
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    async fn scan(dir: &Path) -> Result<Self, std::io::Error> {
        let mut entries = BTreeMap::new();
        let mut leftovers = Vec::new();
        let mut listing = fs::read_dir(dir).await?;
        while let Some(entry) = listing.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!(file = ?file_name, "Ignoring non-UTF-8 file name");
                continue;
            };
            if let Some(day) = day_key(name) {
                entries.insert(day, entry.path());
            } else if temp_day_key(name).is_some() {
                debug!(file = name, "Found leftover temporary file");
                leftovers.push(entry.path());
            } else {
                debug!(file = name, "Ignoring non-artifact file");
            }
        }
        Ok(Self { entries, leftovers })
    }

    pub fn get(&self, day: NaiveDate) -> Option<&Path> {
        self.entries.get(&day).map(PathBuf::as_path)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Temporary files from interrupted saves.
    pub fn leftovers(&self) -> &[PathBuf] {
        &self.leftovers
    }
}

/// Snapshot persistence rooted at one cache directory.
#[derive(Debug)]
pub struct CacheStore {
    dir: PathBuf,
    index: CacheIndex,
}

impl CacheStore {
    /// Create the directory if needed and index the artifacts already in it.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        let io_err = |source| CacheError::Io {
            path: dir.clone(),
            source,
        };
        fs::create_dir_all(&dir).await.map_err(io_err)?;
        let index = CacheIndex::scan(&dir).await.map_err(io_err)?;
        info!(artifacts = index.len(), "Indexed cache directory");
        Ok(Self { dir, index })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index(&self) -> &CacheIndex {
        &self.index
    }

    /// Delete every artifact not dated `today`, and every leftover temporary
    /// file.
    ///
    /// Eviction never aborts the run. Each stale entry leaves the index before
    /// its file is deleted, so an artifact that could not be removed is still
    /// never loaded.
    ///
    /// # Arguments
    ///
    /// * `today` - The only day whose artifact is kept.
    ///
    /// # Returns
    ///
    /// The number of files actually removed. Failed deletes are logged at
    /// `error` and skipped.
    #[instrument(level = "info", skip(self), fields(dir = %self.dir.display()))]
    pub async fn evict_stale(&mut self, today: NaiveDate) -> usize {
        let stale: Vec<(NaiveDate, PathBuf)> = self
            .index
            .entries
            .iter()
            .filter(|(day, _)| **day != today)
            .map(|(day, path)| (*day, path.clone()))
            .collect();
        for (day, _) in &stale {
            self.index.entries.remove(day);
        }
        let leftovers = std::mem::take(&mut self.index.leftovers);

        let mut removed = 0;
        let doomed = stale
            .into_iter()
            .map(|(day, path)| (Some(day), path))
            .chain(leftovers.into_iter().map(|path| (None, path)));
        for (day, path) in doomed {
            match fs::remove_file(&path).await {
                Ok(()) => {
                    removed += 1;
                    info!(path = %path.display(), ?day, "Evicted stale cache file");
                }
                Err(e) => {
                    error!(
                        path = %path.display(),
                        ?day,
                        error = %e,
                        "Failed to evict cache file; skipping"
                    );
                }
            }
        }
        removed
    }

    /// Today's snapshot, or `None` on a cache miss.
    ///
    /// # Arguments
    ///
    /// * `today` - Day key of the artifact to read.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the index has no artifact for `today`.
    ///
    /// # Errors
    ///
    /// A present artifact that cannot be read ([`CacheError::Io`]), is not a
    /// `{site: {word: count}}` object ([`CacheError::Parse`]), or holds blank
    /// site names or too-short words ([`CacheError::Invalid`]). These are never
    /// treated as a miss.
    #[instrument(level = "info", skip(self), fields(dir = %self.dir.display()))]
    pub async fn load(&self, today: NaiveDate) -> Result<Option<Snapshot>, CacheError> {
        let Some(path) = self.index.get(today) else {
            info!("No cache artifact for today");
            return Ok(None);
        };

        let text = fs::read_to_string(path).await.map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_str(&text).map_err(|source| CacheError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        validate(&snapshot).map_err(|reason| CacheError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(path = %path.display(), sites = snapshot.len(), "Loaded today's cache artifact");
        Ok(Some(snapshot))
    }

    /// Write `snapshot` as today's artifact, replacing any existing one.
    ///
    /// The JSON is written to a temporary file first and renamed into place.
    /// On failure the temporary file is removed.
    ///
    /// # Arguments
    ///
    /// * `today` - Day key the artifact is saved under.
    /// * `snapshot` - Every site's table; Hangul is written unescaped.
    ///
    /// # Returns
    ///
    /// The path of the saved artifact, which is also recorded in the index.
    ///
    /// # Errors
    ///
    /// [`CacheError::Io`] when the temporary file cannot be written or renamed.
    #[instrument(level = "info", skip(self, snapshot), fields(dir = %self.dir.display()))]
    pub async fn save(
        &mut self,
        today: NaiveDate,
        snapshot: &Snapshot,
    ) -> Result<PathBuf, CacheError> {
        let path = self.dir.join(artifact_name(today));
        let tmp_path = self.dir.join(temp_name(today));

        let json = serde_json::to_string(snapshot).map_err(|source| CacheError::Parse {
            path: path.clone(),
            source,
        })?;
        if let Err(source) = fs::write(&tmp_path, json).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(CacheError::Io {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(CacheError::Io { path, source });
        }

        self.index.entries.insert(today, path.clone());
        info!(path = %path.display(), sites = snapshot.len(), "Saved cache artifact");
        Ok(path)
    }
}

fn validate(snapshot: &Snapshot) -> Result<(), String> {
    for (site, table) in snapshot.iter() {
        if site.trim().is_empty() {
            return Err("blank site name".to_string());
        }
        if let Some(word) = table.words().find(|w| w.chars().count() < MIN_WORD_CHARS) {
            return Err(format!("site '{site}' has too-short word {word:?}"));
        }
    }
    if snapshot.is_empty() {
        warn!("Cache artifact holds no sites");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FrequencyTable;
    use tempfile::tempdir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn snapshot(site: &str, pairs: &[(&str, u64)]) -> Snapshot {
        let table: FrequencyTable = pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect();
        let mut snap = Snapshot::new();
        snap.insert(site, table);
        snap
    }

    #[test]
    fn test_artifact_name_and_day_key() {
        let today = day("2026-10-18");
        assert_eq!(artifact_name(today), "2026-10-18_site_freq.json");
        assert_eq!(day_key("2026-10-18_site_freq.json"), Some(today));
        assert_eq!(day_key("2026-10-18_other.json"), None);
        assert_eq!(day_key("notes_site_freq.json"), None);
        assert_eq!(day_key("2026-13-40_site_freq.json"), None);
    }

    #[test]
    fn test_temp_name_round_trips_day() {
        let today = day("2026-10-18");
        assert_eq!(temp_name(today), ".2026-10-18_site_freq.json.tmp");
        assert_eq!(temp_day_key(&temp_name(today)), Some(today));
        assert_eq!(temp_day_key("2026-10-18_site_freq.json"), None);
        assert_eq!(day_key(&temp_name(today)), None);
    }

    #[tokio::test]
    async fn test_evict_keeps_only_today() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        std::fs::write(dir.path().join("2026-10-17_site_freq.json"), r#"{"A":{"어제":1}}"#).unwrap();
        std::fs::write(dir.path().join("2026-10-18_site_freq.json"), r#"{"A":{"오늘":2}}"#).unwrap();
        std::fs::write(dir.path().join("README.txt"), "keep me").unwrap();

        let mut store = CacheStore::open(dir.path()).await.unwrap();
        assert_eq!(store.index().len(), 2);
        assert_eq!(store.evict_stale(today).await, 1);

        assert!(!dir.path().join("2026-10-17_site_freq.json").exists());
        assert!(dir.path().join("2026-10-18_site_freq.json").exists());
        assert!(dir.path().join("README.txt").exists());
        assert_eq!(store.index().days().collect::<Vec<_>>(), vec![today]);

        let loaded = store.load(today).await.unwrap().unwrap();
        assert_eq!(loaded, snapshot("A", &[("오늘", 2)]));
    }

    #[tokio::test]
    async fn test_failed_eviction_is_skipped() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        let yesterday = day("2026-10-17");
        std::fs::write(dir.path().join(artifact_name(today)), r#"{"A":{"오늘":2}}"#).unwrap();

        let mut store = CacheStore::open(dir.path()).await.unwrap();
        // indexed, but the file is already gone, so the delete fails
        store
            .index
            .entries
            .insert(yesterday, dir.path().join(artifact_name(yesterday)));
        assert_eq!(store.index().len(), 2);

        assert_eq!(store.evict_stale(today).await, 0);
        assert_eq!(store.index().days().collect::<Vec<_>>(), vec![today]);
        assert!(store.load(yesterday).await.unwrap().is_none());
        assert_eq!(
            store.load(today).await.unwrap(),
            Some(snapshot("A", &[("오늘", 2)]))
        );
    }

    #[tokio::test]
    async fn test_evict_removes_leftover_temp_files() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        let old_tmp = dir.path().join(temp_name(day("2026-10-17")));
        let today_tmp = dir.path().join(temp_name(today));
        std::fs::write(&old_tmp, "{\"A\":").unwrap();
        std::fs::write(&today_tmp, "{").unwrap();

        let mut store = CacheStore::open(dir.path()).await.unwrap();
        assert!(store.index().is_empty());
        assert_eq!(store.index().leftovers().len(), 2);

        assert_eq!(store.evict_stale(today).await, 2);
        assert!(!old_tmp.exists());
        assert!(!today_tmp.exists());
        assert!(store.index().leftovers().is_empty());
        assert!(store.load(today).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        let mut store = CacheStore::open(dir.path()).await.unwrap();
        // a directory in the temp file's place makes the write fail
        std::fs::create_dir(dir.path().join(temp_name(today))).unwrap();

        let err = store.save(today, &snapshot("A", &[("정치", 1)])).await.unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }), "got {err}");
        assert!(!dir.path().join(artifact_name(today)).exists());
        assert!(store.index().get(today).is_none());
    }

    #[tokio::test]
    async fn test_load_miss_is_none() {
        let dir = tempdir().unwrap();
        let cache_dir = dir.path().join("cache");
        let store = CacheStore::open(&cache_dir).await.unwrap();
        assert!(cache_dir.is_dir());
        assert!(store.load(day("2026-10-18")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_hangul() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        let snap = snapshot("네이버뉴스", &[("정치", 5), ("경제", 3)]);

        let mut store = CacheStore::open(dir.path()).await.unwrap();
        let path = store.save(today, &snap).await.unwrap();
        assert_eq!(path, dir.path().join("2026-10-18_site_freq.json"));
        assert!(!dir.path().join(temp_name(today)).exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("정치"), "words must not be escaped: {raw}");
        assert!(!raw.contains("\\u"));

        // a fresh store sees the artifact through its own scan
        let reopened = CacheStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.load(today).await.unwrap(), Some(snap.clone()));

        // saving again overwrites in place
        store.save(today, &snap).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_malformed_artifact_fails_loudly() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        std::fs::write(dir.path().join(artifact_name(today)), "{\"A\": {\"정치\": 5,").unwrap();

        let store = CacheStore::open(dir.path()).await.unwrap();
        let err = store.load(today).await.unwrap_err();
        assert!(matches!(err, CacheError::Parse { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_parse_error() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        std::fs::write(dir.path().join(artifact_name(today)), r#"{"A": {"정치": 1.5}}"#).unwrap();

        let store = CacheStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.load(today).await,
            Err(CacheError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_short_word_is_invalid() {
        let dir = tempdir().unwrap();
        let today = day("2026-10-18");
        std::fs::write(dir.path().join(artifact_name(today)), r#"{"A": {"": 4}}"#).unwrap();

        let store = CacheStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.load(today).await,
            Err(CacheError::Invalid { .. })
        ));
    }
}
