//! Monoisotopic element masses and derived neutral-loss masses.
//!
//! Derived masses are `const` items built with [`formula_mass`], so every rule
//! shares one compile-time value instead of recomputing skeleton masses per call.

use super::formula::formula_mass;

pub const CARBON: f64 = 12.0;
pub const HYDROGEN: f64 = 1.007_825_032_07;
pub const DEUTERIUM: f64 = 2.014_101_777_8;
pub const NITROGEN: f64 = 14.003_074_004_8;
pub const OXYGEN: f64 = 15.994_914_619_56;
pub const PHOSPHORUS: f64 = 30.973_761_63;
pub const SULFUR: f64 = 31.972_071_00;
pub const SODIUM: f64 = 22.989_769_28;
pub const POTASSIUM: f64 = 38.963_706_68;

pub const PROTON: f64 = 1.007_276_466_88;
pub const ELECTRON: f64 = 0.000_548_579_9;

// Small neutrals
pub const WATER: f64 = formula_mass(0, 2, 0, 1, 0, 0);
pub const AMMONIA: f64 = formula_mass(0, 3, 1, 0, 0, 0);
/// HCOOH
pub const FORMIC_ACID: f64 = formula_mass(1, 2, 0, 2, 0, 0);
/// CH3COOH
pub const ACETIC_ACID: f64 = formula_mass(2, 4, 0, 2, 0, 0);
/// H3PO4
pub const PHOSPHORIC_ACID: f64 = formula_mass(0, 3, 0, 4, 1, 0);
/// N(CH3)3, lost from acylcarnitines
pub const TRIMETHYLAMINE: f64 = formula_mass(3, 9, 1, 0, 0, 0);

// Glycerophospholipid head groups, as neutral losses
/// C5H14NO4P, phosphocholine
pub const PC_HEADER: f64 = formula_mass(5, 14, 1, 4, 1, 0);
/// C2H8NO4P, phosphoethanolamine
pub const PE_HEADER: f64 = formula_mass(2, 8, 1, 4, 1, 0);
/// C3H8NO6P, phosphoserine
pub const PS_HEADER: f64 = formula_mass(3, 8, 1, 6, 1, 0);
/// C3H9O6P, glycerophosphate
pub const PG_HEADER: f64 = formula_mass(3, 9, 0, 6, 1, 0);
/// C6H13O9P, inositol phosphate
pub const PI_HEADER: f64 = formula_mass(6, 13, 0, 9, 1, 0);
/// C3H5NO2, serine lost from [PS-H]-
pub const SERINE_LOSS: f64 = formula_mass(3, 5, 1, 2, 0, 0);
/// C2H4O2, methyl formate equivalent lost from [PC+HCOO]-
pub const PC_FORMATE_LOSS: f64 = formula_mass(2, 4, 0, 2, 0, 0);
/// C3H6O2, methyl acetate equivalent lost from [PC+CH3COO]-
pub const PC_ACETATE_LOSS: f64 = formula_mass(3, 6, 0, 2, 0, 0);

// Product ions
/// C5H15NO4P+, phosphocholine cation
pub const PHOSPHOCHOLINE_ION: f64 = PC_HEADER + PROTON;
/// C2H7NO4P-, phosphoethanolamine anion
pub const PHOSPHOETHANOLAMINE_ANION: f64 = PE_HEADER - PROTON;
/// C3H6O5P-, dehydrated glycerophosphate anion
pub const GLYCEROPHOSPHATE_ANION: f64 = formula_mass(3, 7, 0, 5, 1, 0) - PROTON;
/// C6H10O8P-, dehydrated inositol phosphate anion
pub const INOSITOL_PHOSPHATE_ANION: f64 = formula_mass(6, 11, 0, 8, 1, 0) - PROTON;
/// C27H45+, cholestadiene cation from cholesteryl esters
pub const CHOLESTADIENE_ION: f64 = formula_mass(27, 45, 0, 0, 0, 0) - ELECTRON;
/// C4H5O2+, carnitine backbone fragment
pub const CARNITINE_FRAGMENT_ION: f64 = formula_mass(4, 4, 0, 2, 0, 0) + PROTON;
