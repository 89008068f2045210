//! Exact masses and formula arithmetic.
//!
//! - [`constants`]: element masses and the neutral-loss / header masses used by
//!   the class rules, evaluated once at compile time
//! - [`formula`]: elemental compositions and acyl/alkyl/sphingoid chain masses
//!
//! ## Example
//!
//! ```rust
//! use lipid_solver::chemistry::constants::{PC_HEADER, PROTON};
//! use lipid_solver::chemistry::formula::ketene_mass;
//!
//! let precursor = 760.585_081_6;
//! let header_loss = precursor - PC_HEADER;
//! let sn1_loss = precursor - ketene_mass(16, 0).unwrap();
//! assert!(header_loss > sn1_loss);
//! assert!(PROTON > 1.0);
//! ```

pub mod constants;
pub mod formula;
