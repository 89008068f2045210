use crate::chemistry::constants::{CARNITINE_FRAGMENT_ION, CHOLESTADIENE_ION, TRIMETHYLAMINE};
use crate::core::adduct::Adduct;
use crate::core::types::LipidClass;
use crate::matching::enumerate::PositionConstraint;
use crate::matching::rules::template::{AdductBranch, ClassTemplate, Gate};

fn single_acyl() -> Vec<PositionConstraint> {
    vec![PositionConstraint::acyl().with_min_carbon(2)]
}

fn ce() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Ce, single_acyl()).branch(
        AdductBranch::new(Adduct::Ammoniated)
            .gate(Gate::product(CHOLESTADIENE_ION, 5.0))
            .min_found(0),
    )
}

fn car() -> ClassTemplate {
    ClassTemplate::new(LipidClass::Car, single_acyl()).branch(
        AdductBranch::new(Adduct::Protonated)
            .gate(Gate::product(CARNITINE_FRAGMENT_ION, 5.0))
            .class_ion(Gate::neutral_loss(TRIMETHYLAMINE, 1.0))
            .min_found(0),
    )
}

pub(super) fn templates() -> Vec<ClassTemplate> {
    vec![ce(), car()]
}
