use crate::chemistry::constants::{FORMIC_ACID, PC_FORMATE_LOSS, PHOSPHOCHOLINE_ION, WATER};
use crate::core::adduct::Adduct;
use crate::core::types::LipidClass;
use crate::matching::enumerate::PositionConstraint;
use crate::matching::rules::template::{AdductBranch, ChainFragment, ClassTemplate, Gate};

fn base_acyl() -> Vec<PositionConstraint> {
    vec![PositionConstraint::sphingoid(), PositionConstraint::acyl().with_min_carbon(2)]
}

fn sm() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Sm, base_acyl())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .chain_fragments(&[ChainFragment::SphingoidBase])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Formate)
                .gate(Gate::neutral_loss(PC_FORMATE_LOSS, 1.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn cer_ns() -> ClassTemplate {
    ClassTemplate::new(LipidClass::CerNs, base_acyl())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::neutral_loss(WATER, 1.0))
                .exclude(LipidClass::Sm, Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .chain_fragments(&[ChainFragment::SphingoidBase])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::ProtonatedMinusWater)
                .gate(Gate::neutral_loss(WATER, 1.0))
                .chain_fragments(&[ChainFragment::SphingoidBase])
                .min_found(1),
        )
        .branch(AdductBranch::new(Adduct::Formate).gate(Gate::neutral_loss(FORMIC_ACID, 1.0)))
}

pub(super) fn templates() -> Vec<ClassTemplate> {
    vec![sm(), cer_ns()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::{Chain, ChainSet};
    use crate::core::molecule::ReferenceMolecule;
    use crate::core::peak::SpectrumPeak;
    use crate::core::types::AnnotationLevel;
    use crate::matching::engine::AnnotationConfig;
    use crate::matching::rules::{ClassRule, Rejection, RuleContext, RuleOutcome};

    fn evaluate(
        template: &ClassTemplate,
        reference: &ReferenceMolecule,
        spectrum: &[SpectrumPeak],
    ) -> RuleOutcome {
        let config = AnnotationConfig::default();
        template.evaluate(&RuleContext {
            spectrum,
            reference,
            config: &config,
        })
    }

    #[test]
    fn test_sm_sphingoid_base() {
        let reference = ReferenceMolecule::new(
            "SM 34:1;2O",
            LipidClass::Sm,
            Adduct::Protonated,
            703.574_851,
            ChainSet::total(34, 1, 2),
        );
        let spectrum = vec![
            SpectrumPeak::new(184.0733, 100.0),
            SpectrumPeak::new(264.2686, 4.0),
        ];
        let best = evaluate(&sm(), &reference, &spectrum)
            .best()
            .cloned()
            .unwrap();
        assert_eq!(best.name, "SM 18:1;2O_16:0");
        assert_eq!(best.level, AnnotationLevel::MolecularSpecies);
        assert_eq!(
            best.chains.chains().unwrap(),
            &[Chain::sphingoid(18, 1, 2), Chain::acyl(16, 0)]
        );
    }

    #[test]
    fn test_cer_rejects_sm_headgroup() {
        let reference = ReferenceMolecule::new(
            "Cer 34:1;2O",
            LipidClass::CerNs,
            Adduct::Protonated,
            538.519_371,
            ChainSet::total(34, 1, 2),
        );
        let spectrum = vec![
            SpectrumPeak::new(184.0733, 50.0),
            SpectrumPeak::new(264.2686, 100.0),
            SpectrumPeak::new(520.5088, 20.0),
        ];
        assert!(matches!(
            evaluate(&cer_ns(), &reference, &spectrum),
            RuleOutcome::NoMatch(Rejection::CompetingClassIon {
                class: LipidClass::Sm,
                ..
            })
        ));

        let best = evaluate(&cer_ns(), &reference, &spectrum[1..])
            .best()
            .cloned()
            .unwrap();
        assert_eq!(best.name, "Cer 18:1;2O_16:0");
    }
}
