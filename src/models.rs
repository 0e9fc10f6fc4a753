//! Data models shared by the frequency pipeline and the presentation layer.
//!
//! - [`FrequencyTable`]: word → count for one site on one day
//! - [`Snapshot`]: every configured site's table for "today"
//! - [`SelectionState`]: which sites are currently active
//! - [`RankedView`] / [`RankedWord`]: the derived top-N ranking
//!
//! Tables and snapshots serialize as plain JSON objects so the on-disk cache
//! artifact is `{"site": {"word": count}}` with no wrapper fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Word counts for a single site.
///
/// Only words that occurred at least once are stored; an absent key means a
/// count of zero. A table is never mutated once it has been built or loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable(BTreeMap<String, u64>);

impl FrequencyTable {
    /// Count for `word`, zero when absent.
    pub fn get(&self, word: &str) -> u64 {
        self.0.get(word).copied().unwrap_or(0)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl FromIterator<(String, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|(_, c)| *c > 0).collect())
    }
}

/// All sites' frequency tables for one calendar day, keyed by site name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, FrequencyTable>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, site: impl Into<String>, table: FrequencyTable) {
        self.0.insert(site.into(), table);
    }

    pub fn table(&self, site: &str) -> Option<&FrequencyTable> {
        self.0.get(site)
    }

    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = &FrequencyTable> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrequencyTable)> {
        self.0.iter().map(|(s, t)| (s.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FrequencyTable)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, FrequencyTable)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, FrequencyTable)> for Snapshot {
    fn extend<I: IntoIterator<Item = (String, FrequencyTable)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Which sites are active, in configured site order.
///
/// Owned by the presentation layer and handed to the aggregator by
/// reference. Starts with every site active and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    active: Vec<bool>,
}

impl SelectionState {
    /// Every one of `site_count` sites active.
    pub fn all_active(site_count: usize) -> Self {
        Self {
            active: vec![true; site_count],
        }
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    /// Flip one site. Returns the new state, or `None` for an unknown index.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.active.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn set_all(&mut self, value: bool) {
        self.active.iter_mut().for_each(|a| *a = value);
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }
}

/// One ranked word with its per-site breakdown.
///
/// `counts` follows the `sites` order of the enclosing [`RankedView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWord {
    pub word: String,
    pub counts: Vec<u64>,
    pub total: u64,
}

/// Result of ranking a [`Snapshot`] under a [`SelectionState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankedView {
    /// No site is active; nothing was computed.
    NoSelection,
    /// Top words for the active sites.
    Ranked {
        /// Active site names in configured order.
        sites: Vec<String>,
        /// Highest total first.
        words: Vec<RankedWord>,
    },
}

impl RankedView {
    pub fn words(&self) -> &[RankedWord] {
        match self {
            RankedView::NoSelection => &[],
            RankedView::Ranked { words, .. } => words,
        }
    }

    /// `(word, total)` pairs in rank order.
    pub fn totals(&self) -> Vec<(&str, u64)> {
        self.words()
            .iter()
            .map(|w| (w.word.as_str(), w.total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, u64)]) -> FrequencyTable {
        pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn test_frequency_table_absent_word_is_zero() {
        let t = table(&[("정치", 5)]);
        assert_eq!(t.get("정치"), 5);
        assert_eq!(t.get("경제"), 0);
    }

    #[test]
    fn test_frequency_table_drops_zero_counts() {
        let t = table(&[("정치", 5), ("날씨", 0)]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.total(), 5);
    }

    #[test]
    fn test_snapshot_serializes_as_plain_nested_object() {
        let mut snap = Snapshot::new();
        snap.insert("KBS", table(&[("경제", 3)]));
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"KBS":{"경제":3}}"#);
    }

    #[test]
    fn test_snapshot_sites_are_sorted() {
        let snap: Snapshot = [("KBS", 1), ("JTBC", 2)]
            .into_iter()
            .map(|(s, c)| (s.to_string(), table(&[("정치", c)])))
            .collect();
        assert_eq!(snap.sites().collect::<Vec<_>>(), vec!["JTBC", "KBS"]);
    }

    #[test]
    fn test_snapshot_rejects_negative_counts() {
        let result: Result<Snapshot, _> = serde_json::from_str(r#"{"KBS":{"경제":-1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_selection_toggle_and_counts() {
        let mut sel = SelectionState::all_active(3);
        assert_eq!(sel.active_count(), 3);
        assert_eq!(sel.toggle(1), Some(false));
        assert!(!sel.is_active(1));
        assert_eq!(sel.active_count(), 2);
        assert_eq!(sel.toggle(7), None);
        sel.set_all(false);
        assert_eq!(sel.active_count(), 0);
    }

    #[test]
    fn test_no_selection_has_no_words() {
        assert!(RankedView::NoSelection.words().is_empty());
        assert!(RankedView::NoSelection.totals().is_empty());
    }
}
