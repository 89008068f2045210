//! # lipid-solver
//!
//! A library for annotating lipids from tandem mass spectra.
//!
//! A precursor m/z alone rarely identifies a lipid: many classes and chain
//! combinations share a nominal mass, and one sum composition such as
//! `PC 34:1` covers several molecular species.
//!
//! `lipid-solver` resolves this by matching each MS/MS spectrum against a
//! library of candidate species and applying class-specific fragmentation
//! rules to the fragments it finds.
//!
//! ## Features
//!
//! - **Class confirmation**: Head group ions and neutral losses gate each class
//! - **Competing-class rejection**: Ions of isobaric classes veto a match
//! - **Chain resolution**: Sum compositions are split into individual chains
//!   supported by chain fragments
//! - **Reference spectra**: Fully specified species are scored against their
//!   role-tagged theoretical fragments
//! - **Batch annotation**: Query spectra are annotated in parallel
//!
//! ## Example
//!
//! ```rust
//! use lipid_solver::{AnnotationEngine, IonMode, LipidLibrary, QuerySpectrum};
//! use lipid_solver::parsing::library::{parse_library_text, LibraryFormat};
//!
//! // Build a library from delimited text
//! let entries = parse_library_text("PC 34:1\t760.585082\t[M+H]+\n", LibraryFormat::Tsv).unwrap();
//! let library = LipidLibrary::from_entries(entries);
//!
//! // A PC 34:1 [M+H]+ spectrum with phosphocholine, header loss and both ketene losses
//! let query = QuerySpectrum::new("scan_1", 760.585, IonMode::Positive)
//!     .with_peak(184.0733, 100.0)
//!     .with_peak(577.5190, 30.0)
//!     .with_peak(522.3554, 20.0)
//!     .with_peak(496.3398, 20.0);
//!
//! let engine = AnnotationEngine::new(&library);
//! if let Some(result) = engine.characterize(&query) {
//!     println!("{} (level {}, score {:.2})", result.name, result.level, result.score);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Lipid library storage and precursor window search
//! - [`chemistry`]: Element masses and chain formulas
//! - [`core`]: Core data types for chains, peaks, adducts, and molecules
//! - [`matching`]: Annotation engine, class rules, and scoring
//! - [`parsing`]: Parsers for lipid names, libraries, and query spectra
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod chemistry;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::LipidLibrary;
pub use core::molecule::{LipidMolecule, ReferenceMolecule};
pub use core::peak::{QuerySpectrum, SpectrumPeak};
pub use core::types::*;
pub use matching::engine::{AnnotationConfig, AnnotationEngine};
