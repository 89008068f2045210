use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::LipidLibrary;
use crate::core::molecule::ReferenceMolecule;

/// Refinement steps taken by [`WindowSearch::Legacy`]
pub const LEGACY_ITERATIONS: usize = 10;

/// How the start of the precursor window is located
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WindowSearch {
    /// Bisection to the first entry with m/z >= the window's lower edge
    #[default]
    Exact,
    /// Fixed number of halving steps. On libraries larger than about a
    /// thousand entries the start index may stop short of the bound, which only
    /// lengthens the forward scan.
    Legacy,
}

/// First index whose m/z is >= `target`
#[must_use]
pub fn lower_bound(entries: &[ReferenceMolecule], target: f64) -> usize {
    entries.partition_point(|e| e.mz < target)
}

/// Start index from [`LEGACY_ITERATIONS`] halving steps.
///
/// The start only moves onto an entry with m/z <= `target`, so scanning forward
/// from it reaches every entry above `target`.
#[must_use]
pub fn legacy_start_index(entries: &[ReferenceMolecule], target: f64) -> usize {
    if entries.is_empty() {
        return 0;
    }
    let mut start = 0;
    let mut end = entries.len() - 1;
    for _ in 0..LEGACY_ITERATIONS {
        let middle = (start + end) / 2;
        if entries[start].mz <= target && target < entries[middle].mz {
            end = middle;
        } else if entries[middle].mz <= target && target < entries[end].mz {
            start = middle;
        }
    }
    start
}

/// Finds library entries whose precursor m/z lies inside a tolerance window
pub struct CandidateFinder<'a> {
    library: &'a LipidLibrary,
    search: WindowSearch,
}

impl<'a> CandidateFinder<'a> {
    #[must_use]
    pub fn new(library: &'a LipidLibrary, search: WindowSearch) -> Self {
        Self { library, search }
    }

    /// Index the forward scan starts from
    #[must_use]
    pub fn start_index(&self, lower: f64) -> usize {
        match self.search {
            WindowSearch::Exact => lower_bound(self.library.entries(), lower),
            WindowSearch::Legacy => legacy_start_index(self.library.entries(), lower),
        }
    }

    /// Indices of entries with `mz - tolerance <= entry.mz <= mz + tolerance`,
    /// ascending by m/z
    #[must_use]
    pub fn find_candidates(&self, mz: f64, tolerance: f64) -> Vec<usize> {
        let (lower, upper) = (mz - tolerance, mz + tolerance);
        let start = self.start_index(lower);

        let mut candidates = Vec::new();
        for (index, entry) in self.library.entries().iter().enumerate().skip(start) {
            if entry.mz < lower {
                continue;
            }
            if entry.mz > upper {
                break;
            }
            candidates.push(index);
        }

        debug!(
            "Window {:.4}-{:.4}: start index {}, {} candidates",
            lower,
            upper,
            start,
            candidates.len()
        );
        candidates
    }
}
