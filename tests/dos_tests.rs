//! Resource limit tests
//!
//! Library entries with absurd chain counts must be rejected at load time,
//! and entries built directly through the API must not hang or crash the
//! engine.

use std::time::{Duration, Instant};

use lipid_solver::core::adduct::Adduct;
use lipid_solver::core::chain::{Chain, ChainSet};
use lipid_solver::parsing::library::{parse_library_text, LibraryFormat};
use lipid_solver::parsing::lipid_name::{parse_lipid_name, NameParseError};
use lipid_solver::utils::validation::{MAX_CHAIN_CARBON, MAX_CHAIN_DOUBLE_BONDS};
use lipid_solver::{
    AnnotationEngine, AnnotationLevel, IonMode, LipidClass, LipidLibrary, QuerySpectrum,
    ReferenceMolecule,
};

const PC_34_1: f64 = 760.585_082;

/// Phosphocholine and the phosphocholine neutral loss, no chain fragments
fn pc_class_query() -> QuerySpectrum {
    QuerySpectrum::new("pc", 760.585, IonMode::Positive)
        .with_peak(184.0733, 1000.0)
        .with_peak(577.5190, 300.0)
}

#[test]
fn test_oversized_names_are_rejected() {
    for name in ["PC 34:50000000", "PC 1100000000:0_16:0"] {
        assert!(
            matches!(parse_lipid_name(name), Err(NameParseError::OutOfRange { .. })),
            "{name}"
        );
    }
    let at_limit = format!("PC {MAX_CHAIN_CARBON}:{MAX_CHAIN_DOUBLE_BONDS}");
    assert!(parse_lipid_name(&at_limit).is_ok());
}

#[test]
fn test_library_skips_oversized_lines() {
    let tsv = "\
PC 34:50000000\t760.585082\t[M+H]+
PC 1100000000:0_16:0\t760.585082\t[M+H]+
PC 34:1\t760.585082\t[M+H]+
";
    let entries = parse_library_text(tsv, LibraryFormat::Tsv).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "PC 34:1");

    let only_oversized = "PC 34:50000000\t760.585082\t[M+H]+\n";
    assert!(parse_library_text(only_oversized, LibraryFormat::Tsv).is_err());
}

#[test]
fn test_huge_double_bond_total_finishes() {
    let library = LipidLibrary::from_entries(vec![ReferenceMolecule::new(
        "PC 34:50000000",
        LipidClass::Pc,
        Adduct::Protonated,
        PC_34_1,
        ChainSet::total(34, 50_000_000, 0),
    )]);
    let engine = AnnotationEngine::new(&library);

    let start = Instant::now();
    let result = engine.characterize(&pc_class_query()).unwrap();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(result.level, AnnotationLevel::SumComposition);
}

#[test]
fn test_huge_chain_carbon_does_not_panic() {
    let library = LipidLibrary::from_entries(vec![ReferenceMolecule::new(
        "PC 1100000000:0_16:0",
        LipidClass::Pc,
        Adduct::Protonated,
        PC_34_1,
        ChainSet::separated(vec![Chain::acyl(1_100_000_000, 0), Chain::acyl(16, 0)], false),
    )]);
    let engine = AnnotationEngine::new(&library);

    let result = engine.characterize(&pc_class_query()).unwrap();
    assert_eq!(result.level, AnnotationLevel::SumComposition);
    assert_eq!(result.characterization.chain_ions_detected, 0);
}
