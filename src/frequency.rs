//! Frequency table construction.

use crate::models::FrequencyTable;
use std::collections::BTreeMap;

/// Count occurrences of each token.
///
/// The result depends only on the multiset of tokens, never on their order.
/// Empty input gives an empty table.
pub fn build<I>(tokens: I) -> FrequencyTable
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}
