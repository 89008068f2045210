//! Characterization of fully specified library entries.
//!
//! Entries that carry a reference spectrum are scored by matching each tagged
//! reference peak against the observed spectrum. The annotation keeps as much
//! of the entry's structure as the evidence supports:
//!
//! | Evidence | Reported |
//! |----------|----------|
//! | position and double-bond ions | the entry exactly as written |
//! | position ions | sn-positions, double-bond locations dropped |
//! | chain ions | chains without positions |
//! | otherwise | sum composition |

use crate::core::chain::ChainSet;
use crate::core::molecule::LipidMolecule;
use crate::core::peak::{PeakRole, SpectrumPeak};
use crate::core::types::IntensityBasis;
use crate::matching::fragment::find_peak;
use crate::matching::rules::{Rejection, RuleContext, RuleOutcome};
use crate::matching::scoring::{CharacterizationResult, Evidence};

/// A reference peak with `matched` set, and the observed abundance if found
pub type MatchedPeak = (SpectrumPeak, Option<f64>);

/// Match every reference peak against the observed spectrum
#[must_use]
pub fn match_reference_peaks(
    spectrum: &[SpectrumPeak],
    reference_peaks: &[SpectrumPeak],
    tolerance: f64,
    min_abundance: f64,
    basis: IntensityBasis,
) -> Vec<MatchedPeak> {
    reference_peaks
        .iter()
        .map(|reference| {
            let observed = find_peak(spectrum, tolerance, reference.mz, min_abundance, basis)
                .map(|peak| peak.abundance(basis));
            let mut peak = reference.clone();
            peak.matched = observed.is_some();
            (peak, observed)
        })
        .collect()
}

/// Add matched reference peaks to the evidence, by role
pub fn collect_evidence(matched: &[MatchedPeak], evidence: &mut Evidence) {
    for (peak, observed) in matched {
        for role in &peak.roles {
            match role {
                PeakRole::ClassIon => evidence.class.record(*observed),
                PeakRole::ChainIon => evidence.chain.record(*observed),
                PeakRole::PositionIon => evidence.position.record(*observed),
                PeakRole::DoubleBondHigh => {
                    evidence.double_bond.record(peak.resolution, *observed, true);
                }
                PeakRole::DoubleBondLow => {
                    evidence.double_bond.record(peak.resolution, *observed, false);
                }
            }
        }
    }
}

/// Composition supported by a scored result
#[must_use]
pub fn reduce_chains(chains: &ChainSet, result: &CharacterizationResult) -> ChainSet {
    let chains = chains.without_double_bond_positions();
    if result.is_position_ions_existed {
        chains
    } else if result.is_chain_ions_existed {
        chains.unordered()
    } else {
        chains.summed()
    }
}

/// Score an entry with a reference spectrum. `evidence` already holds the
/// class evidence from the gates.
pub fn characterize(ctx: &RuleContext<'_>, mut evidence: Evidence) -> RuleOutcome {
    let reference = ctx.reference;
    let matched = match_reference_peaks(
        ctx.spectrum,
        &reference.reference_spectrum,
        ctx.config.ms2_tolerance,
        ctx.config.reference_fragment_abundance,
        ctx.config.intensity_basis,
    );

    if let Some((missing, _)) = matched.iter().find(|(peak, _)| peak.required && !peak.matched) {
        return RuleOutcome::NoMatch(Rejection::RequiredIonMissing { mz: missing.mz });
    }

    collect_evidence(&matched, &mut evidence);
    let result = CharacterizationResult::score(&evidence, ctx.config.score_mode);

    let molecule = if result.is_position_ions_existed && result.is_double_bond_ions_existed {
        LipidMolecule::from_reference(reference, result)
    } else {
        let chains = reduce_chains(&reference.chains, &result);
        LipidMolecule::derived(reference, chains, result)
    };
    RuleOutcome::Matched(vec![molecule])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adduct::Adduct;
    use crate::core::chain::Chain;
    use crate::core::molecule::ReferenceMolecule;
    use crate::core::types::{AnnotationLevel, LipidClass};
    use crate::matching::engine::AnnotationConfig;

    fn reference() -> ReferenceMolecule {
        ReferenceMolecule::new(
            "PC 16:0/18:1(9Z)",
            LipidClass::Pc,
            Adduct::Protonated,
            760.585_082,
            ChainSet::separated(
                vec![
                    Chain::acyl(16, 0),
                    Chain::acyl(18, 1).with_double_bond_positions(vec![9]),
                ],
                true,
            ),
        )
        .with_reference_spectrum(vec![
            SpectrumPeak::new(184.0733, 100.0).with_role(PeakRole::ClassIon),
            SpectrumPeak::new(496.3398, 20.0).with_role(PeakRole::ChainIon),
            SpectrumPeak::new(522.3554, 10.0).with_role(PeakRole::ChainIon),
            SpectrumPeak::new(478.3292, 5.0).with_role(PeakRole::PositionIon),
            SpectrumPeak::new(650.4755, 0.0)
                .with_resolution(40.0)
                .with_role(PeakRole::DoubleBondHigh),
            SpectrumPeak::new(636.4599, 0.0)
                .with_resolution(10.0)
                .with_role(PeakRole::DoubleBondLow),
        ])
    }

    fn run(spectrum: &[SpectrumPeak], reference: &ReferenceMolecule) -> RuleOutcome {
        let config = AnnotationConfig::default();
        let ctx = RuleContext {
            spectrum,
            reference,
            config: &config,
        };
        characterize(&ctx, Evidence::default())
    }

    fn full_spectrum() -> Vec<SpectrumPeak> {
        vec![
            SpectrumPeak::new(184.0733, 100.0),
            SpectrumPeak::new(478.3292, 6.0),
            SpectrumPeak::new(496.3398, 20.0),
            SpectrumPeak::new(522.3554, 12.0),
            SpectrumPeak::new(636.4599, 2.0),
            SpectrumPeak::new(650.4755, 8.0),
        ]
    }

    #[test]
    fn test_fully_specified_is_unchanged() {
        let reference = reference();
        let best = run(&full_spectrum(), &reference).best().cloned().unwrap();
        assert_eq!(best.name, reference.name);
        assert_eq!(best.chains, reference.chains);
        assert_eq!(best.level, AnnotationLevel::Position);
        assert!(best.characterization.is_position_ions_existed);
        assert!(best.characterization.is_double_bond_ions_existed);
        assert_eq!(best.matched_ion_count, 6);
    }

    #[test]
    fn test_reduces_without_double_bond_ions() {
        let spectrum: Vec<_> = full_spectrum().into_iter().filter(|p| p.mz < 600.0).collect();
        let best = run(&spectrum, &reference()).best().cloned().unwrap();
        assert_eq!(best.name, "PC 16:0/18:1");
        assert_eq!(best.level, AnnotationLevel::Position);

        let chains_only: Vec<_> = spectrum
            .iter()
            .filter(|p| (p.mz - 478.3292).abs() > 0.01)
            .cloned()
            .collect();
        let best = run(&chains_only, &reference()).best().cloned().unwrap();
        assert_eq!(best.name, "PC 16:0_18:1");
        assert_eq!(best.level, AnnotationLevel::MolecularSpecies);

        let class_only = vec![SpectrumPeak::new(184.0733, 100.0)];
        let best = run(&class_only, &reference()).best().cloned().unwrap();
        assert_eq!(best.name, "PC 34:1");
        assert_eq!(best.level, AnnotationLevel::SumComposition);
    }

    #[test]
    fn test_required_peak_missing() {
        let mut reference = reference();
        reference.reference_spectrum[3] = reference.reference_spectrum[3].clone().as_required();
        let spectrum: Vec<_> = full_spectrum()
            .into_iter()
            .filter(|p| (p.mz - 478.3292).abs() > 0.01)
            .collect();
        let outcome = run(&spectrum, &reference);
        assert!(matches!(
            outcome,
            RuleOutcome::NoMatch(Rejection::RequiredIonMissing { .. })
        ));
    }

    #[test]
    fn test_match_sets_flags() {
        let reference = reference();
        let matched = match_reference_peaks(
            &[SpectrumPeak::new(184.0733, 50.0)],
            &reference.reference_spectrum,
            0.01,
            0.0,
            IntensityBasis::Intensity,
        );
        assert_eq!(matched.len(), 6);
        assert!(matched[0].0.matched);
        assert!((matched[0].1.unwrap() - 50.0).abs() < 1e-9);
        assert!(matched[1..].iter().all(|(peak, observed)| !peak.matched && observed.is_none()));
    }
}
