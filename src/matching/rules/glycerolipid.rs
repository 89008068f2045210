use crate::chemistry::constants::{AMMONIA, WATER};
use crate::core::adduct::Adduct;
use crate::core::types::LipidClass;
use crate::matching::enumerate::PositionConstraint;
use crate::matching::rules::template::{AdductBranch, ChainFragment, ClassTemplate, Gate};

fn tg() -> ClassTemplate {
    ClassTemplate::new(
        LipidClass::Tg,
        vec![
            PositionConstraint::acyl().with_min_carbon(2),
            PositionConstraint::acyl().with_min_carbon(2),
            PositionConstraint::acyl().with_min_carbon(2),
        ],
    )
    .branch(
        AdductBranch::new(Adduct::Ammoniated)
            .chain_fragments(&[ChainFragment::FattyAcidAmmoniaLoss])
            .min_found(2)
            .require_chains(),
    )
    .branch(
        AdductBranch::new(Adduct::Sodiated)
            .chain_fragments(&[ChainFragment::FattyAcidLoss])
            .min_found(2)
            .require_chains(),
    )
}

fn dg() -> ClassTemplate {
    ClassTemplate::new(
        LipidClass::Dg,
        vec![
            PositionConstraint::acyl().with_min_carbon(2),
            PositionConstraint::acyl().with_min_carbon(2),
        ],
    )
    .branch(
        AdductBranch::new(Adduct::Ammoniated)
            .gate(Gate::neutral_loss(WATER + AMMONIA, 1.0))
            .chain_fragments(&[ChainFragment::FattyAcidAmmoniaLoss])
            .min_found(1),
    )
    .branch(
        AdductBranch::new(Adduct::Sodiated)
            .chain_fragments(&[ChainFragment::FattyAcidLoss])
            .min_found(1)
            .require_chains(),
    )
}

pub(super) fn templates() -> Vec<ClassTemplate> {
    vec![tg(), dg()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::ChainSet;
    use crate::core::molecule::ReferenceMolecule;
    use crate::core::peak::SpectrumPeak;
    use crate::core::types::AnnotationLevel;
    use crate::matching::engine::AnnotationConfig;
    use crate::matching::rules::{ClassRule, Rejection, RuleContext, RuleOutcome};

    fn tg_reference() -> ReferenceMolecule {
        ReferenceMolecule::new(
            "TG 52:2",
            LipidClass::Tg,
            Adduct::Ammoniated,
            876.801_467,
            ChainSet::total(52, 2, 0),
        )
    }

    fn evaluate(reference: &ReferenceMolecule, spectrum: &[SpectrumPeak]) -> RuleOutcome {
        let config = AnnotationConfig::default();
        tg().evaluate(&RuleContext {
            spectrum,
            reference,
            config: &config,
        })
    }

    #[test]
    fn test_tg_three_chains() {
        let spectrum = vec![
            SpectrumPeak::new(577.5190, 100.0),
            SpectrumPeak::new(603.5347, 45.0),
        ];
        let outcome = evaluate(&tg_reference(), &spectrum);
        let best = outcome.best().unwrap();
        assert_eq!(best.name, "TG 16:0_18:1_18:1");
        assert_eq!(best.level, AnnotationLevel::MolecularSpecies);
        assert_eq!(best.characterization.chain_ions_detected, 3);
    }

    #[test]
    fn test_tg_requires_chains() {
        let spectrum = vec![SpectrumPeak::new(700.0, 100.0)];
        assert_eq!(
            evaluate(&tg_reference(), &spectrum),
            RuleOutcome::NoMatch(Rejection::InsufficientChainIons)
        );
    }
}
