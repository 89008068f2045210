//! Enumeration of per-position chain splits.
//!
//! Given summed chain counts and one [`PositionConstraint`] per position,
//! [`ChainSplits`] lazily yields every assignment of (carbon, double bonds)
//! whose sums equal the totals. All positions but the last are free; the last
//! takes whatever remains. For two acyl positions with minimum carbon `m` the
//! raw sequence has `(C - 2m + 1) * (D + 1)` entries before the per-position
//! double-bond ceiling is applied.

use crate::core::chain::{Chain, TotalChain};
use crate::core::types::ChainKind;

/// Smallest fatty chain considered at a position
pub const DEFAULT_MIN_CARBON: u32 = 6;

/// Most double bonds a single fatty chain may carry
pub const DEFAULT_MAX_DOUBLE_BONDS: u32 = 7;

/// Allowed values at one chain position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionConstraint {
    pub kind: ChainKind,
    pub min_carbon: u32,
    pub max_carbon: Option<u32>,
    pub max_double_bonds: u32,
    /// Oxidation count fixed at this position. Ignored on the last position,
    /// which receives the remainder of the total.
    pub oxidized: u32,
}

impl PositionConstraint {
    #[must_use]
    pub fn new(kind: ChainKind) -> Self {
        Self {
            kind,
            min_carbon: DEFAULT_MIN_CARBON,
            max_carbon: None,
            max_double_bonds: DEFAULT_MAX_DOUBLE_BONDS,
            oxidized: 0,
        }
    }

    #[must_use]
    pub fn acyl() -> Self {
        Self::new(ChainKind::Acyl)
    }

    #[must_use]
    pub fn alkyl() -> Self {
        Self::new(ChainKind::Alkyl)
    }

    /// Dihydroxy sphingoid base between 14 and 22 carbons
    #[must_use]
    pub fn sphingoid() -> Self {
        Self::new(ChainKind::Sphingoid)
            .with_min_carbon(14)
            .with_max_carbon(22)
            .with_max_double_bonds(3)
            .with_oxidized(2)
    }

    #[must_use]
    pub fn with_min_carbon(mut self, min_carbon: u32) -> Self {
        self.min_carbon = min_carbon;
        self
    }

    #[must_use]
    pub fn with_max_carbon(mut self, max_carbon: u32) -> Self {
        self.max_carbon = Some(max_carbon);
        self
    }

    #[must_use]
    pub fn with_max_double_bonds(mut self, max_double_bonds: u32) -> Self {
        self.max_double_bonds = max_double_bonds;
        self
    }

    #[must_use]
    pub fn with_oxidized(mut self, oxidized: u32) -> Self {
        self.oxidized = oxidized;
        self
    }

    fn admits_carbon(&self, carbon: u32) -> bool {
        carbon >= self.min_carbon && self.max_carbon.is_none_or(|max| carbon <= max)
    }
}

/// Lazy, single-pass sequence of chain splits
#[derive(Debug, Clone)]
pub struct ChainSplits<'a> {
    total: TotalChain,
    layout: &'a [PositionConstraint],
    /// (carbon, double bonds) of every position except the last
    state: Vec<(u32, u32)>,
    apply_ceiling: bool,
    started: bool,
    exhausted: bool,
}

impl<'a> ChainSplits<'a> {
    #[must_use]
    pub fn new(total: TotalChain, layout: &'a [PositionConstraint]) -> Self {
        let fixed_oxidized: u32 = layout
            .iter()
            .take(layout.len().saturating_sub(1))
            .map(|p| p.oxidized)
            .sum();
        Self {
            total,
            layout,
            state: vec![(0, 0); layout.len().saturating_sub(1)],
            apply_ceiling: true,
            started: false,
            exhausted: layout.is_empty() || fixed_oxidized > total.oxidized,
        }
    }

    /// Also yield splits that exceed a position's double-bond ceiling
    #[must_use]
    pub fn without_ceiling(mut self) -> Self {
        self.apply_ceiling = false;
        self
    }

    fn used(&self, upto: usize) -> (u32, u32) {
        self.state[..upto]
            .iter()
            .fold((0, 0), |(c, d), &(pc, pd)| (c + pc, d + pd))
    }

    /// Inclusive carbon range of free position `index` given the positions before it
    fn carbon_range(&self, index: usize) -> Option<(u32, u32)> {
        let (used_carbon, _) = self.used(index);
        let reserved: u32 = self.layout[index + 1..].iter().map(|p| p.min_carbon).sum();
        let constraint = &self.layout[index];
        let mut high = self.total.carbon.checked_sub(used_carbon + reserved)?;
        if let Some(max) = constraint.max_carbon {
            high = high.min(max);
        }
        (constraint.min_carbon <= high).then_some((constraint.min_carbon, high))
    }

    /// Highest double-bond count free position `index` may take
    fn double_bond_high(&self, index: usize) -> u32 {
        let (_, used_double_bonds) = self.used(index);
        let remaining = self.total.double_bonds.saturating_sub(used_double_bonds);
        if self.apply_ceiling {
            remaining.min(self.layout[index].max_double_bonds)
        } else {
            remaining
        }
    }

    /// Put positions `from..` at their lowest values
    fn reset_from(&mut self, from: usize) -> bool {
        for index in from..self.state.len() {
            match self.carbon_range(index) {
                Some((low, _)) => self.state[index] = (low, 0),
                None => return false,
            }
        }
        true
    }

    /// Step to the next state, carrying into earlier positions as needed
    fn increment(&mut self) -> bool {
        for index in (0..self.state.len()).rev() {
            let (carbon, double_bonds) = self.state[index];
            if double_bonds < self.double_bond_high(index) {
                self.state[index].1 += 1;
            } else if self
                .carbon_range(index)
                .is_some_and(|(_, high)| carbon < high)
            {
                self.state[index] = (carbon + 1, 0);
            } else {
                continue;
            }
            if self.reset_from(index + 1) {
                return true;
            }
        }
        false
    }

    fn current(&self) -> Option<Vec<Chain>> {
        let (used_carbon, used_double_bonds) = self.used(self.state.len());
        let last = self.layout.last()?;
        let last_carbon = self.total.carbon.checked_sub(used_carbon)?;
        let last_double_bonds = self.total.double_bonds.checked_sub(used_double_bonds)?;
        if !last.admits_carbon(last_carbon) {
            return None;
        }

        let mut chains = Vec::with_capacity(self.layout.len());
        let mut used_oxidized = 0;
        for (constraint, &(carbon, double_bonds)) in self.layout.iter().zip(&self.state) {
            if self.apply_ceiling && double_bonds > constraint.max_double_bonds {
                return None;
            }
            used_oxidized += constraint.oxidized;
            chains.push(
                Chain::new(constraint.kind, carbon, double_bonds)
                    .with_oxidized(constraint.oxidized),
            );
        }
        if self.apply_ceiling && last_double_bonds > last.max_double_bonds {
            return None;
        }
        chains.push(
            Chain::new(last.kind, last_carbon, last_double_bonds)
                .with_oxidized(self.total.oxidized - used_oxidized),
        );
        Some(chains)
    }
}

impl Iterator for ChainSplits<'_> {
    type Item = Vec<Chain>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.exhausted {
                return None;
            }
            let moved = if self.started {
                self.increment()
            } else {
                self.started = true;
                self.reset_from(0)
            };
            if !moved {
                self.exhausted = true;
                return None;
            }
            if let Some(chains) = self.current() {
                return Some(chains);
            }
        }
    }
}

/// Enumerate splits of `total` over `layout`
#[must_use]
pub fn enumerate(total: TotalChain, layout: &[PositionConstraint]) -> ChainSplits<'_> {
    ChainSplits::new(total, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(chains: &[Chain]) -> (u32, u32, u32) {
        chains.iter().fold((0, 0, 0), |(c, d, o), chain| {
            (c + chain.carbon, d + chain.double_bonds, o + chain.oxidized)
        })
    }

    #[test]
    fn test_two_position_raw_count() {
        let layout = [PositionConstraint::acyl(), PositionConstraint::acyl()];
        for (carbon, double_bonds) in [(34, 1), (36, 4), (12, 0), (40, 12)] {
            let splits: Vec<_> = enumerate(TotalChain::new(carbon, double_bonds, 0), &layout)
                .without_ceiling()
                .collect();
            let expected = (carbon - 2 * DEFAULT_MIN_CARBON + 1) * (double_bonds + 1);
            assert_eq!(splits.len(), expected as usize, "C={carbon} D={double_bonds}");
            for chains in &splits {
                assert_eq!(sums(chains), (carbon, double_bonds, 0));
            }
        }
    }

    #[test]
    fn test_double_bond_ceiling() {
        let layout = [PositionConstraint::acyl(), PositionConstraint::acyl()];
        let total = TotalChain::new(40, 12, 0);
        let raw = enumerate(total, &layout).without_ceiling().count();
        let filtered: Vec<_> = enumerate(total, &layout).collect();
        assert!(filtered.len() < raw);
        assert!(filtered
            .iter()
            .all(|chains| chains.iter().all(|c| c.double_bonds <= DEFAULT_MAX_DOUBLE_BONDS)));
    }

    #[test]
    fn test_ceiling_limits_the_walk() {
        let layout = [PositionConstraint::acyl(), PositionConstraint::acyl()];
        let total = TotalChain::new(40, 12, 0);
        let filtered: Vec<_> = enumerate(total, &layout)
            .without_ceiling()
            .filter(|chains| chains.iter().all(|c| c.double_bonds <= DEFAULT_MAX_DOUBLE_BONDS))
            .collect();
        assert_eq!(enumerate(total, &layout).collect::<Vec<_>>(), filtered);

        // no split can hold this many double bonds; only the capped range is walked
        let start = std::time::Instant::now();
        assert_eq!(enumerate(TotalChain::new(34, 50_000_000, 0), &layout).count(), 0);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_too_few_carbons() {
        let layout = [PositionConstraint::acyl(), PositionConstraint::acyl()];
        assert_eq!(enumerate(TotalChain::new(10, 0, 0), &layout).count(), 0);
        assert_eq!(enumerate(TotalChain::new(34, 1, 0), &[]).count(), 0);
    }

    #[test]
    fn test_three_positions() {
        let layout = [
            PositionConstraint::acyl(),
            PositionConstraint::acyl(),
            PositionConstraint::acyl(),
        ];
        let splits: Vec<_> = enumerate(TotalChain::new(20, 1, 0), &layout).collect();
        // carbon: sn1 in 6..=8 with sn2 in 6..=(14 - sn1): 3 + 2 + 1 = 6 pairs,
        // double bond: 3 placements of one double bond
        assert_eq!(splits.len(), 18);
        for chains in &splits {
            assert_eq!(chains.len(), 3);
            assert_eq!(sums(chains), (20, 1, 0));
        }
    }

    #[test]
    fn test_single_position() {
        let layout = [PositionConstraint::acyl()];
        let splits: Vec<_> = enumerate(TotalChain::new(18, 1, 0), &layout).collect();
        assert_eq!(splits, vec![vec![Chain::acyl(18, 1)]]);
    }

    #[test]
    fn test_sphingoid_takes_fixed_oxidation() {
        let layout = [PositionConstraint::sphingoid(), PositionConstraint::acyl()];
        let splits: Vec<_> = enumerate(TotalChain::new(34, 1, 2), &layout).collect();
        assert!(splits.contains(&vec![Chain::sphingoid(18, 1, 2), Chain::acyl(16, 0)]));
        for chains in &splits {
            assert_eq!(chains[0].kind, ChainKind::Sphingoid);
            assert!((14..=22).contains(&chains[0].carbon));
            assert_eq!(chains[1].oxidized, 0);
            assert_eq!(sums(chains), (34, 1, 2));
        }

        // not enough oxidation for a dihydroxy base
        assert_eq!(enumerate(TotalChain::new(34, 1, 1), &layout).count(), 0);
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let layout = [PositionConstraint::acyl()];
        let mut splits = enumerate(TotalChain::new(18, 0, 0), &layout);
        assert!(splits.next().is_some());
        assert!(splits.next().is_none());
        assert!(splits.next().is_none());
    }
}
