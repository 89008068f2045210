//! Lipid annotation engine and scoring algorithms.
//!
//! This module provides the core annotation functionality:
//!
//! - [`AnnotationEngine`]: Main entry point for annotating query spectra
//! - [`RuleRegistry`]: Class rules keyed by lipid class
//! - [`CharacterizationResult`]: Per-category evidence scores for one candidate
//!
//! ## Annotation Algorithm
//!
//! For each query spectrum:
//!
//! 1. **Window search**: Library entries with precursor m/z within the MS1
//!    tolerance are located by bisection and a forward scan
//! 2. **Class rules**: Each entry is handed to the rule for its class, which
//!    checks diagnostic ions and rejects competing classes
//! 3. **Chain resolution**: Summed compositions are split into candidate
//!    chains, and the splits supported by chain fragments are kept
//! 4. **Selection**: The highest scoring candidate across all entries wins
//!
//! ## Scoring
//!
//! The total score is the sum of four category scores:
//!
//! - **Class ions**: Head group and backbone fragments
//! - **Chain ions**: Fragments identifying individual chains
//! - **Position ions**: Fragments identifying sn-positions
//! - **Double-bond ions**: Matched fraction plus correlation of expected and
//!   observed abundances
//!
//! ## Example
//!
//! ```rust
//! use lipid_solver::{AnnotationEngine, LipidLibrary, QuerySpectrum, IonMode};
//! use lipid_solver::parsing::library::{parse_library_text, LibraryFormat};
//!
//! let entries = parse_library_text("PC 34:1\t760.585082\t[M+H]+\n", LibraryFormat::Tsv).unwrap();
//! let library = LipidLibrary::from_entries(entries);
//!
//! let query = QuerySpectrum::new("scan_1", 760.585, IonMode::Positive)
//!     .with_peak(184.0733, 100.0)
//!     .with_peak(577.5190, 30.0)
//!     .with_peak(522.3554, 20.0)
//!     .with_peak(496.3398, 20.0);
//!
//! let engine = AnnotationEngine::new(&library);
//! let result = engine.characterize(&query).unwrap();
//! assert_eq!(result.name, "PC 16:0_18:1");
//! ```

pub mod engine;
pub mod enumerate;
pub mod fragment;
pub mod reference;
pub mod rules;
pub mod scoring;

pub use engine::{AnnotationConfig, AnnotationEngine};
pub use rules::{ClassRule, RuleOutcome, RuleRegistry};
pub use scoring::CharacterizationResult;
