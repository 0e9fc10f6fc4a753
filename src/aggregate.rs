//! Cross-site ranking of words.
//!
//! The candidate vocabulary is fixed once per snapshot: the union of every
//! site's words, whether or not the site is currently active. Toggling sites
//! only changes the counts used to rank those candidates.
//!
//! Ranking sorts candidates by their total over active sites, highest first.
//! The vocabulary iterates in lexicographic order and the sort is stable, so
//! equal totals are ordered lexicographically.

use crate::config::Site;
use crate::models::{RankedView, RankedWord, SelectionState, Snapshot};
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Number of words shown in the chart.
pub const DEFAULT_TOP_N: usize = 10;

/// Union of all words across all sites of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary(BTreeSet<String>);

impl Vocabulary {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self(
            snapshot
                .tables()
                .flat_map(|t| t.words())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Top `n` words by combined count over the active sites.
///
/// # Arguments
///
/// * `snapshot` - Today's tables; a site missing from it counts as zero.
/// * `vocabulary` - Candidate words, built once from the whole snapshot.
/// * `sites` - Configured sites, in display order.
/// * `selection` - Which of `sites` are active.
/// * `n` - Maximum number of words returned.
///
/// # Returns
///
/// [`RankedView::NoSelection`] without touching any counts when no site is
/// active. Otherwise up to `n` words, highest total first, with per-site
/// counts in configured order restricted to the active sites. Zero-total
/// candidates fill the list when fewer than `n` words have a positive total.
#[instrument(level = "debug", skip_all, fields(active = selection.active_count(), n = n))]
pub fn rank(
    snapshot: &Snapshot,
    vocabulary: &Vocabulary,
    sites: &[Site],
    selection: &SelectionState,
    n: usize,
) -> RankedView {
    if selection.active_count() == 0 {
        debug!("No active sites; skipping ranking");
        return RankedView::NoSelection;
    }

    let active: Vec<&Site> = sites
        .iter()
        .enumerate()
        .filter(|(i, _)| selection.is_active(*i))
        .map(|(_, site)| site)
        .collect();
    let tables: Vec<_> = active.iter().map(|s| snapshot.table(&s.name)).collect();

    let words: Vec<RankedWord> = vocabulary
        .iter()
        .map(|word| {
            let counts: Vec<u64> = tables
                .iter()
                .map(|t| t.map_or(0, |t| t.get(word)))
                .collect();
            let total = counts.iter().sum();
            RankedWord {
                word: word.to_string(),
                counts,
                total,
            }
        })
        .sorted_by_key(|w| Reverse(w.total))
        .take(n)
        .collect();

    debug!(candidates = vocabulary.len(), ranked = words.len(), "Ranked vocabulary");
    RankedView::Ranked {
        sites: active.iter().map(|s| s.name.clone()).collect(),
        words,
    }
}
