use crate::chemistry::constants::{
    AMMONIA, GLYCEROPHOSPHATE_ANION, INOSITOL_PHOSPHATE_ANION, PC_ACETATE_LOSS, PC_FORMATE_LOSS,
    PC_HEADER, PE_HEADER, PG_HEADER, PHOSPHOCHOLINE_ION, PHOSPHOETHANOLAMINE_ANION,
    PHOSPHORIC_ACID, PI_HEADER, PS_HEADER, SERINE_LOSS, TRIMETHYLAMINE, WATER,
};
use crate::core::adduct::Adduct;
use crate::core::types::LipidClass;
use crate::matching::enumerate::PositionConstraint;
use crate::matching::rules::template::{AdductBranch, ChainFragment, ClassTemplate, Gate};

fn diacyl() -> Vec<PositionConstraint> {
    vec![PositionConstraint::acyl(), PositionConstraint::acyl()]
}

fn alkyl_acyl() -> Vec<PositionConstraint> {
    vec![PositionConstraint::alkyl(), PositionConstraint::acyl()]
}

fn lyso() -> Vec<PositionConstraint> {
    vec![PositionConstraint::acyl().with_min_carbon(2)]
}

fn pc() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Pc, diacyl())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::neutral_loss(PC_HEADER, 1.0))
                .class_ion(Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .exclude(LipidClass::Pe, Gate::neutral_loss(PE_HEADER, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss])
                .min_found(2),
        )
        .branch(
            AdductBranch::new(Adduct::Sodiated)
                .gate(Gate::neutral_loss(TRIMETHYLAMINE, 1.0))
                .class_ion(Gate::neutral_loss(PC_HEADER, 1.0))
                .chain_fragments(&[ChainFragment::FattyAcidLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Formate)
                .gate(Gate::neutral_loss(PC_FORMATE_LOSS, 1.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Acetate)
                .gate(Gate::neutral_loss(PC_ACETATE_LOSS, 1.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn pe() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Pe, diacyl())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::neutral_loss(PE_HEADER, 5.0))
                .exclude(LipidClass::Pc, Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Deprotonated)
                .gate(Gate::product(PHOSPHOETHANOLAMINE_ANION, 0.1))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn ps() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Ps, diacyl())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::neutral_loss(PS_HEADER, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Deprotonated)
                .gate(Gate::neutral_loss(SERINE_LOSS, 5.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn pg() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Pg, diacyl())
        .branch(
            AdductBranch::new(Adduct::Ammoniated)
                .gate(Gate::neutral_loss(PG_HEADER + AMMONIA, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Deprotonated)
                .gate(Gate::product(GLYCEROPHOSPHATE_ANION, 1.0))
                .exclude(LipidClass::Pi, Gate::product(INOSITOL_PHOSPHATE_ANION, 5.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn pi() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Pi, diacyl())
        .branch(
            AdductBranch::new(Adduct::Ammoniated)
                .gate(Gate::neutral_loss(PI_HEADER + AMMONIA, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Deprotonated)
                .gate(Gate::product(INOSITOL_PHOSPHATE_ANION, 1.0))
                .class_ion(Gate::product(GLYCEROPHOSPHATE_ANION, 1.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn pa() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Pa, diacyl())
        .branch(
            AdductBranch::new(Adduct::Ammoniated)
                .gate(Gate::neutral_loss(PHOSPHORIC_ACID + AMMONIA, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Deprotonated)
                .gate(Gate::product(GLYCEROPHOSPHATE_ANION, 1.0))
                .exclude(LipidClass::Pi, Gate::product(INOSITOL_PHOSPHATE_ANION, 5.0))
                .exclude(LipidClass::Ps, Gate::neutral_loss(SERINE_LOSS, 5.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn lpc() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Lpc, lyso())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .class_ion(Gate::neutral_loss(WATER, 1.0))
                .min_found(0),
        )
        .branch(
            AdductBranch::new(Adduct::Sodiated)
                .gate(Gate::neutral_loss(TRIMETHYLAMINE, 1.0))
                .min_found(0),
        )
        .branch(
            AdductBranch::new(Adduct::Formate)
                .gate(Gate::neutral_loss(PC_FORMATE_LOSS, 1.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(0),
        )
}

fn lpe() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Lpe, lyso())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::neutral_loss(PE_HEADER, 5.0))
                .exclude(LipidClass::Lpc, Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .min_found(0),
        )
        .branch(
            AdductBranch::new(Adduct::Deprotonated)
                .gate(Gate::product(PHOSPHOETHANOLAMINE_ANION, 0.1))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(0),
        )
}

fn ether_pc() -> ClassTemplate {
    ClassTemplate::new(LipidClass::EtherPc, alkyl_acyl())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss, ChainFragment::AlcoholLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Sodiated)
                .gate(Gate::neutral_loss(TRIMETHYLAMINE, 1.0))
                .chain_fragments(&[ChainFragment::FattyAcidLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Formate)
                .gate(Gate::neutral_loss(PC_FORMATE_LOSS, 1.0))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

fn ether_pe() -> ClassTemplate {
    ClassTemplate::new(LipidClass::EtherPe, alkyl_acyl())
        .branch(
            AdductBranch::new(Adduct::Protonated)
                .gate(Gate::neutral_loss(PE_HEADER, 1.0))
                .exclude(LipidClass::EtherPc, Gate::product(PHOSPHOCHOLINE_ION, 5.0))
                .chain_fragments(&[ChainFragment::KeteneLoss, ChainFragment::AlcoholLoss])
                .min_found(1),
        )
        .branch(
            AdductBranch::new(Adduct::Deprotonated)
                .gate(Gate::product(PHOSPHOETHANOLAMINE_ANION, 0.1))
                .chain_fragments(&[ChainFragment::Carboxylate])
                .min_found(1),
        )
}

pub(super) fn templates() -> Vec<ClassTemplate> {
    vec![
        pc(),
        pe(),
        ps(),
        pg(),
        pi(),
        pa(),
        lpc(),
        lpe(),
        ether_pc(),
        ether_pe(),
    ]
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
    fn test_ether_pe_alcohol_loss() {
        let reference = ReferenceMolecule::new(
            "PE O-34:1",
            LipidClass::EtherPe,
            Adduct::Protonated,
            704.558_9,
            ChainSet::total(34, 1, 0),
        );
        // Phosphoethanolamine loss and hexadecanol loss
        let spectrum = vec![
            SpectrumPeak::new(462.297_9, 20.0),
            SpectrumPeak::new(563.539_8, 100.0),
        ];
        let outcome = evaluate(&ether_pe(), &reference, &spectrum);
        let best = outcome.best().cloned().unwrap();
        assert_eq!(best.name, "PE O-16:0_18:1");
        assert_eq!(best.level, AnnotationLevel::MolecularSpecies);
    }

    #[test]
    fn test_pe_negative_carboxylates() {
        let reference = ReferenceMolecule::new(
            "PE 34:1",
            LipidClass::Pe,
            Adduct::Deprotonated,
            716.523_579,
            ChainSet::total(34, 1, 0),
        );
        let spectrum = vec![
            SpectrumPeak::new(140.0118, 5.0),
            SpectrumPeak::new(255.2330, 60.0),
            SpectrumPeak::new(281.2486, 100.0),
        ];
        let best = evaluate(&pe(), &reference, &spectrum)
            .best()
            .cloned()
            .unwrap();
        assert_eq!(best.name, "PE 16:0_18:1");
        assert_eq!(best.characterization.chain_ions_detected, 2);
    }

    #[test]
    fn test_pe_rejects_phosphocholine() {
        let reference = ReferenceMolecule::new(
            "PE 37:1",
            LipidClass::Pe,
            Adduct::Protonated,
            760.585_082,
            ChainSet::total(37, 1, 0),
        );
        let spectrum = vec![
            SpectrumPeak::new(184.0733, 100.0),
            SpectrumPeak::new(619.5660, 20.0),
        ];
        assert!(matches!(
            evaluate(&pe(), &reference, &spectrum),
            RuleOutcome::NoMatch(Rejection::CompetingClassIon {
                class: LipidClass::Pc,
                ..
            })
        ));
    }

    #[test]
    fn test_lpc_single_chain() {
        let reference = ReferenceMolecule::new(
            "LPC 18:1",
            LipidClass::Lpc,
            Adduct::Protonated,
            522.355_416,
            ChainSet::total(18, 1, 0),
        );
        let spectrum = vec![SpectrumPeak::new(184.0733, 100.0), SpectrumPeak::new(504.3449, 10.0)];
        let best = evaluate(&lpc(), &reference, &spectrum)
            .best()
            .cloned()
            .unwrap();
        assert_eq!(best.name, "LPC 18:1");
        assert_eq!(best.level, AnnotationLevel::MolecularSpecies);
        assert_eq!(best.characterization.class_ions_detected, 2);
    }

    #[test]
    fn test_pg_rejects_inositol_phosphate() {
        let reference = ReferenceMolecule::new(
            "PG 34:1",
            LipidClass::Pg,
            Adduct::Deprotonated,
            747.518_2,
            ChainSet::total(34, 1, 0),
        );
        let spectrum = vec![
            SpectrumPeak::new(152.9958, 20.0),
            SpectrumPeak::new(241.0119, 30.0),
            SpectrumPeak::new(255.2330, 60.0),
        ];
        assert!(matches!(
            evaluate(&pg(), &reference, &spectrum),
            RuleOutcome::NoMatch(Rejection::CompetingClassIon {
                class: LipidClass::Pi,
                ..
            })
        ));
    }
}
