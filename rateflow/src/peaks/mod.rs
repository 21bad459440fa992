//! Bounded top-N selection of peak nightly rates.

use serde::Serialize;

/// Number of peaks reported per listing.
pub const DEFAULT_PEAK_COUNT: usize = 3;

/// One of the N largest rates, with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakEntry {
    /// Position in the ascending result; `n - 1` is the largest.
    pub rank: usize,
    /// Index of the rate in the input sequence.
    pub original_index: usize,
    /// The rate itself.
    pub value: f64,
}

/// Result of a top-N selection.
///
/// Inputs no longer than `n` are returned as-is, so callers must handle both
/// shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "camelCase")]
pub enum TopN {
    /// The `n` largest values, ascending by value.
    Ranked(Vec<PeakEntry>),
    /// The input, untouched, because it had at most `n` values.
    Unranked(Vec<f64>),
}

impl TopN {
    /// Ranked entries, largest first. Empty for [`TopN::Unranked`].
    #[must_use]
    pub fn descending(&self) -> Vec<PeakEntry> {
        match self {
            Self::Ranked(entries) => entries.iter().rev().copied().collect(),
            Self::Unranked(_) => Vec::new(),
        }
    }

    /// Whether the selection produced ranked entries.
    #[must_use]
    pub fn is_ranked(&self) -> bool {
        matches!(self, Self::Ranked(_))
    }
}

/// Selects the `n` largest values of `values`.
///
/// The working set is seeded with the first `n` values and kept sorted
/// ascending with a stable sort. A later value replaces the entry at the front
/// only if it is strictly greater. Equal values keep their scan order, so the
/// earliest of a tied minimum is the one displaced and the latest of a tied
/// maximum ranks highest. Each replacement re-sorts the set, which is cheap
/// for the small `n` used here.
#[must_use]
pub fn top_n(values: &[f64], n: usize) -> TopN {
    if values.len() <= n {
        return TopN::Unranked(values.to_vec());
    }

    let mut working: Vec<(usize, f64)> = values.iter().copied().enumerate().take(n).collect();
    sort_ascending(&mut working);

    for (index, &value) in values.iter().enumerate().skip(n) {
        if let Some(min) = working.first_mut() {
            if value > min.1 {
                *min = (index, value);
                sort_ascending(&mut working);
            }
        }
    }

    TopN::Ranked(
        working
            .into_iter()
            .enumerate()
            .map(|(rank, (original_index, value))| PeakEntry {
                rank,
                original_index,
                value,
            })
            .collect(),
    )
}

/// Ascending by value. `sort_by` is stable, so ties stay in working-set order.
fn sort_ascending(working: &mut [(usize, f64)]) {
    working.sort_by(|a, b| a.1.total_cmp(&b.1));
}
