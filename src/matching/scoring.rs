use serde::{Deserialize, Serialize};

/// Weight added to the double-bond score when every high-confidence
/// double-bond ion was observed
pub const DOUBLE_BOND_HIGH_BONUS: f64 = 1.5;

const EPSILON: f64 = 1e-10;

/// Safely convert usize to f64 for ratio calculations
///
/// Ion counts are tiny compared to the f64 mantissa, so the precision loss
/// clippy warns about never materializes here.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// How class, chain and position sub-scores are derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// 1.0 when the category's ions exist, else 0.0
    #[default]
    Binary,
    /// Summed matched abundance divided by 100
    AbundanceWeighted,
}

/// Observed evidence for one ion category
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryEvidence {
    pub expected: usize,
    pub detected: usize,
    /// Sum of observed abundance over the detected ions
    pub matched_abundance: f64,
}

impl CategoryEvidence {
    /// Record one expected ion; `observed` is its matched abundance, if found
    pub fn record(&mut self, observed: Option<f64>) {
        self.expected += 1;
        if let Some(abundance) = observed {
            self.detected += 1;
            self.matched_abundance += abundance;
        }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.detected > 0
    }
}

/// Observed evidence for double-bond diagnostic ions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoubleBondEvidence {
    pub expected: usize,
    pub detected: usize,
    pub high_expected: usize,
    pub high_detected: usize,
    /// (expected relative abundance, observed abundance) per expected ion;
    /// unmatched ions contribute an observed abundance of zero
    pub pairs: Vec<(f64, f64)>,
}

impl DoubleBondEvidence {
    pub fn record(
        &mut self,
        expected_abundance: f64,
        observed: Option<f64>,
        high_confidence: bool,
    ) {
        self.expected += 1;
        if high_confidence {
            self.high_expected += 1;
        }
        if observed.is_some() {
            self.detected += 1;
            if high_confidence {
                self.high_detected += 1;
            }
        }
        self.pairs.push((expected_abundance, observed.unwrap_or(0.0)));
    }

    /// At least one ion matched and no high-confidence ion is missing
    #[must_use]
    pub fn exists(&self) -> bool {
        self.detected > 0 && self.high_detected == self.high_expected
    }

    /// `detected / (expected + 1e-10)`, always within `[0, 1]`
    #[must_use]
    pub fn matched_fraction(&self) -> f64 {
        count_to_f64(self.detected) / (count_to_f64(self.expected) + EPSILON)
    }
}

/// Per-category evidence collected by a rule evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    pub class: CategoryEvidence,
    pub chain: CategoryEvidence,
    pub position: CategoryEvidence,
    pub double_bond: DoubleBondEvidence,
}

/// Outcome of scoring one candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterizationResult {
    pub class_ions_detected: usize,
    pub chain_ions_detected: usize,
    pub position_ions_detected: usize,
    pub double_bond_ions_detected: usize,
    pub double_bond_matched_fraction: f64,

    pub is_class_ions_existed: bool,
    pub is_chain_ions_existed: bool,
    pub is_position_ions_existed: bool,
    pub is_double_bond_ions_existed: bool,

    pub class_ion_score: f64,
    pub chain_ion_score: f64,
    pub position_ion_score: f64,
    pub double_bond_ion_score: f64,

    pub total_score: f64,
    pub total_matched_ion_count: usize,
}

impl CharacterizationResult {
    /// Score collected evidence
    #[must_use]
    pub fn score(evidence: &Evidence, mode: ScoreMode) -> Self {
        let category_score = |category: &CategoryEvidence| {
            if !category.exists() {
                return 0.0;
            }
            match mode {
                ScoreMode::Binary => 1.0,
                ScoreMode::AbundanceWeighted => category.matched_abundance / 100.0,
            }
        };

        let class_ion_score = category_score(&evidence.class);
        let chain_ion_score = category_score(&evidence.chain);
        let position_ion_score = category_score(&evidence.position);

        let double_bond = &evidence.double_bond;
        let double_bond_matched_fraction = double_bond.matched_fraction();
        let double_bond_ion_score = if double_bond.expected == 0 {
            0.0
        } else {
            let (expected, observed): (Vec<f64>, Vec<f64>) =
                double_bond.pairs.iter().copied().unzip();
            let mut score = double_bond_matched_fraction + pearson(&expected, &observed);
            let all_high = double_bond.high_detected == double_bond.high_expected;
            if double_bond.high_expected > 0 && all_high {
                score += DOUBLE_BOND_HIGH_BONUS;
            }
            score
        };

        Self {
            class_ions_detected: evidence.class.detected,
            chain_ions_detected: evidence.chain.detected,
            position_ions_detected: evidence.position.detected,
            double_bond_ions_detected: double_bond.detected,
            double_bond_matched_fraction,
            is_class_ions_existed: evidence.class.exists(),
            is_chain_ions_existed: evidence.chain.exists(),
            is_position_ions_existed: evidence.position.exists(),
            is_double_bond_ions_existed: double_bond.exists(),
            class_ion_score,
            chain_ion_score,
            position_ion_score,
            double_bond_ion_score,
            total_score: class_ion_score
                + chain_ion_score
                + position_ion_score
                + double_bond_ion_score,
            total_matched_ion_count: evidence.class.detected
                + evidence.chain.detected
                + evidence.position.detected
                + double_bond.detected,
        }
    }
}

/// Pearson correlation of two equally long series.
///
/// Returns 0.0 for fewer than two points or when either series has zero variance.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / count_to_f64(n);
    let mean_y = ys[..n].iter().sum::<f64>() / count_to_f64(n);

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x <= 0.0 || variance_y <= 0.0 {
        return 0.0;
    }
    covariance / (variance_x.sqrt() * variance_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence() -> Evidence {
        let mut evidence = Evidence::default();
        evidence.class.record(Some(100.0));
        evidence.chain.record(Some(12.0));
        evidence.chain.record(Some(8.0));
        evidence.chain.record(None);
        evidence
    }

    #[test]
    fn test_binary_scores() {
        let result = CharacterizationResult::score(&evidence(), ScoreMode::Binary);
        assert!(result.is_class_ions_existed);
        assert!(result.is_chain_ions_existed);
        assert!(!result.is_position_ions_existed);
        assert!((result.class_ion_score - 1.0).abs() < 1e-9);
        assert!((result.chain_ion_score - 1.0).abs() < 1e-9);
        assert!(result.position_ion_score.abs() < 1e-9);
        assert!((result.total_score - 2.0).abs() < 1e-9);
        assert_eq!(result.chain_ions_detected, 2);
        assert_eq!(result.total_matched_ion_count, 3);
    }

    #[test]
    fn test_abundance_weighted_scores() {
        let result = CharacterizationResult::score(&evidence(), ScoreMode::AbundanceWeighted);
        assert!((result.class_ion_score - 1.0).abs() < 1e-9);
        assert!((result.chain_ion_score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_total_is_sum_of_sub_scores() {
        let mut evidence = evidence();
        evidence.position.record(Some(30.0));
        evidence.double_bond.record(50.0, Some(40.0), true);
        evidence.double_bond.record(20.0, Some(5.0), false);
        evidence.double_bond.record(10.0, None, false);

        for mode in [ScoreMode::Binary, ScoreMode::AbundanceWeighted] {
            let result = CharacterizationResult::score(&evidence, mode);
            let sum = result.class_ion_score
                + result.chain_ion_score
                + result.position_ion_score
                + result.double_bond_ion_score;
            assert!((result.total_score - sum).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&result.double_bond_matched_fraction));
        }
    }

    #[test]
    fn test_double_bond_bonus() {
        let mut evidence = Evidence::default();
        evidence.double_bond.record(50.0, Some(50.0), true);
        evidence.double_bond.record(10.0, Some(10.0), false);
        let result = CharacterizationResult::score(&evidence, ScoreMode::Binary);
        // fraction ~1.0, correlation 1.0, bonus 1.5
        assert!((result.double_bond_ion_score - 3.5).abs() < 1e-6);
        assert!(result.is_double_bond_ions_existed);

        let mut missing_high = Evidence::default();
        missing_high.double_bond.record(50.0, None, true);
        missing_high.double_bond.record(10.0, Some(10.0), false);
        let result = CharacterizationResult::score(&missing_high, ScoreMode::Binary);
        assert!(!result.is_double_bond_ions_existed);
        assert!(result.double_bond_ion_score < DOUBLE_BOND_HIGH_BONUS);
    }

    #[test]
    fn test_empty_evidence_scores_zero() {
        let result = CharacterizationResult::score(&Evidence::default(), ScoreMode::Binary);
        assert!(result.total_score.abs() < f64::EPSILON);
        assert!(result.double_bond_matched_fraction.abs() < f64::EPSILON);
        assert_eq!(result.total_matched_ion_count, 0);
    }

    #[test]
    fn test_pearson() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-9);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-9);
        // zero variance
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).abs() < f64::EPSILON);
        assert!(pearson(&[1.0], &[1.0]).abs() < f64::EPSILON);
        assert!(pearson(&[], &[]).abs() < f64::EPSILON);
    }
}
