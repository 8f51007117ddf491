//! Merge candidate lists from all strategies.
//!
//! Two passes, in this order:
//! 1. walk the lists in strategy priority order and keep the first item per
//!    `(code, unit)`;
//! 2. for differential counts present both as a percentage and as an
//!    absolute count, drop the percentage items.
//!
//! The second pass needs the first: percentage and absolute variants share a
//! code but not a unit, so both survive deduplication.

use std::collections::HashSet;

use super::units::{is_absolute_count, is_percent};
use crate::models::{ExtractedItem, ParameterCode};

/// Merged items plus what was dropped, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Survivors, in priority-then-document order.
    pub items: Vec<ExtractedItem>,
    pub duplicates_dropped: usize,
    pub percent_dropped: usize,
}

/// Merge candidate lists given in strategy priority order.
pub fn merge(lists: &[Vec<ExtractedItem>]) -> MergeOutcome {
    let mut seen: HashSet<(ParameterCode, Option<String>)> = HashSet::new();
    let mut items = Vec::new();
    let mut duplicates_dropped = 0;

    for item in lists.iter().flatten() {
        let key = (item.code(), item.unit().map(str::to_string));
        if seen.insert(key) {
            items.push(item.clone());
        } else {
            duplicates_dropped += 1;
        }
    }

    let with_absolute: HashSet<ParameterCode> = items
        .iter()
        .filter(|i| i.code().is_differential() && is_absolute_count(i.unit()))
        .map(|i| i.code())
        .collect();

    let before = items.len();
    items.retain(|i| !(with_absolute.contains(&i.code()) && is_percent(i.unit())));
    let percent_dropped = before - items.len();

    tracing::debug!(
        merged = items.len(),
        duplicates_dropped,
        percent_dropped,
        "Merged strategy candidates"
    );

    MergeOutcome {
        items,
        duplicates_dropped,
        percent_dropped,
    }
}
