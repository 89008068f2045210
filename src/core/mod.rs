//! Core data types for lipid annotation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`LipidClass`], [`IonMode`], [`AnnotationLevel`]: classification types
//! - [`Adduct`]: the ionization form and its precursor m/z offset
//! - [`Chain`], [`ChainSet`]: acyl/alkyl/sphingoid chain composition, either as a
//!   summed total or as separated per-position chains
//! - [`SpectrumPeak`], [`QuerySpectrum`]: observed and reference peaks
//! - [`ReferenceMolecule`]: a library entry; [`LipidMolecule`]: an annotation
//!
//! ## Naming
//!
//! Names follow the shorthand notation used in lipidomics reports:
//!
//! | Level | Example | Meaning |
//! |-------|---------|---------|
//! | 1 | `PC 34:1` | class and summed chain composition |
//! | 2 | `PC 16:0_18:1` | chains known, positions unordered |
//! | 3 | `PC 16:0/18:1` | chains assigned to sn-positions |
//!
//! [`LipidClass`]: types::LipidClass
//! [`IonMode`]: types::IonMode
//! [`AnnotationLevel`]: types::AnnotationLevel
//! [`Adduct`]: adduct::Adduct
//! [`Chain`]: chain::Chain
//! [`ChainSet`]: chain::ChainSet
//! [`SpectrumPeak`]: peak::SpectrumPeak
//! [`QuerySpectrum`]: peak::QuerySpectrum
//! [`ReferenceMolecule`]: molecule::ReferenceMolecule
//! [`LipidMolecule`]: molecule::LipidMolecule

pub mod adduct;
pub mod chain;
pub mod molecule;
pub mod peak;
pub mod types;
