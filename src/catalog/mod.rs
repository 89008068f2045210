//! Lipid library storage and precursor indexing.
//!
//! A library is a list of reference molecules, each one lipid species observed
//! as one adduct, kept sorted by theoretical precursor m/z. Libraries load
//! from delimited text (`name`, `m/z`, `adduct`) or from JSON, which can also
//! carry role-tagged reference spectra for fully specified species.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lipid_solver::LipidLibrary;
//! use lipid_solver::catalog::index::{CandidateFinder, WindowSearch};
//! use std::path::Path;
//!
//! let library = LipidLibrary::load_from_file(Path::new("library.tsv")).unwrap();
//!
//! // Entries within 0.01 Da of a precursor
//! let finder = CandidateFinder::new(&library, WindowSearch::Exact);
//! for index in finder.find_candidates(760.585, 0.01) {
//!     println!("{}", library.entries()[index].name);
//! }
//!
//! // Export to JSON
//! let json = library.to_json().unwrap();
//! ```

pub mod index;
pub mod store;
