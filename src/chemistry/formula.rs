use std::ops::{Add, Sub};

use thiserror::Error;

use super::constants::{
    CARBON, DEUTERIUM, HYDROGEN, NITROGEN, OXYGEN, PHOSPHORUS, SULFUR,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Negative {element} count ({count}) in composition")]
    NegativeCount { element: &'static str, count: i32 },

    #[error("Atom counts of chain {carbon}:{double_bonds} overflow")]
    Overflow { carbon: u32, double_bonds: u32 },
}

/// Neutral monoisotopic mass of CcHhNnOoPpSs.
///
/// Usable in `const` items, which is how the shared neutral-loss masses are built.
#[must_use]
pub const fn formula_mass(c: u32, h: u32, n: u32, o: u32, p: u32, s: u32) -> f64 {
    c as f64 * CARBON
        + h as f64 * HYDROGEN
        + n as f64 * NITROGEN
        + o as f64 * OXYGEN
        + p as f64 * PHOSPHORUS
        + s as f64 * SULFUR
}

/// Elemental composition with signed counts so that deltas can be composed
/// before the final mass is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composition {
    pub carbon: i32,
    pub hydrogen: i32,
    pub deuterium: i32,
    pub nitrogen: i32,
    pub oxygen: i32,
    pub phosphorus: i32,
    pub sulfur: i32,
}

impl Composition {
    #[must_use]
    pub const fn chnops(c: i32, h: i32, n: i32, o: i32, p: i32, s: i32) -> Self {
        Self {
            carbon: c,
            hydrogen: h,
            deuterium: 0,
            nitrogen: n,
            oxygen: o,
            phosphorus: p,
            sulfur: s,
        }
    }

    #[must_use]
    pub const fn with_deuterium(mut self, count: i32) -> Self {
        self.deuterium = count;
        self
    }

    /// Monoisotopic mass of this composition
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::NegativeCount` if any element count is negative,
    /// e.g. a chain with more double bonds than its carbons can carry.
    pub fn mass(&self) -> Result<f64, FormulaError> {
        let counts = [
            ("carbon", self.carbon, CARBON),
            ("hydrogen", self.hydrogen, HYDROGEN),
            ("deuterium", self.deuterium, DEUTERIUM),
            ("nitrogen", self.nitrogen, NITROGEN),
            ("oxygen", self.oxygen, OXYGEN),
            ("phosphorus", self.phosphorus, PHOSPHORUS),
            ("sulfur", self.sulfur, SULFUR),
        ];

        let mut mass = 0.0;
        for (element, count, unit) in counts {
            if count < 0 {
                return Err(FormulaError::NegativeCount { element, count });
            }
            mass += f64::from(count) * unit;
        }
        Ok(mass)
    }
}

impl Add for Composition {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            carbon: self.carbon + rhs.carbon,
            hydrogen: self.hydrogen + rhs.hydrogen,
            deuterium: self.deuterium + rhs.deuterium,
            nitrogen: self.nitrogen + rhs.nitrogen,
            oxygen: self.oxygen + rhs.oxygen,
            phosphorus: self.phosphorus + rhs.phosphorus,
            sulfur: self.sulfur + rhs.sulfur,
        }
    }
}

impl Sub for Composition {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            carbon: self.carbon - rhs.carbon,
            hydrogen: self.hydrogen - rhs.hydrogen,
            deuterium: self.deuterium - rhs.deuterium,
            nitrogen: self.nitrogen - rhs.nitrogen,
            oxygen: self.oxygen - rhs.oxygen,
            phosphorus: self.phosphorus - rhs.phosphorus,
            sulfur: self.sulfur - rhs.sulfur,
        }
    }
}

/// Signed atom counts for a chain, with hydrogen `2C - 2D + offset`
fn chain_counts(carbon: u32, double_bonds: u32, offset: i64) -> Result<(i32, i32), FormulaError> {
    let overflow = || FormulaError::Overflow {
        carbon,
        double_bonds,
    };
    let hydrogen = 2 * i64::from(carbon) - 2 * i64::from(double_bonds) + offset;
    let carbon_count = i32::try_from(carbon).map_err(|_| overflow())?;
    let hydrogen_count = i32::try_from(hydrogen).map_err(|_| overflow())?;
    Ok((carbon_count, hydrogen_count))
}

/// Fatty acid R-COOH: CnH(2n-2d)O2
///
/// # Errors
///
/// Returns `FormulaError::Overflow` when the counts do not fit a composition.
pub fn fatty_acid_composition(carbon: u32, double_bonds: u32) -> Result<Composition, FormulaError> {
    let (c, h) = chain_counts(carbon, double_bonds, 0)?;
    Ok(Composition::chnops(c, h, 0, 2, 0, 0))
}

/// Acyl radical R-CO: CnH(2n-2d-1)O
///
/// # Errors
///
/// Returns an error when the double-bond count leaves a negative hydrogen count
/// or the counts overflow.
pub fn acyl_chain_mass(carbon: u32, double_bonds: u32) -> Result<f64, FormulaError> {
    let (c, h) = chain_counts(carbon, double_bonds, -1)?;
    Composition::chnops(c, h, 0, 1, 0, 0).mass()
}

/// Ketene R'-CH=C=O, the neutral lost from an ester on collisional activation
///
/// # Errors
///
/// Returns an error when the double-bond count leaves a negative hydrogen count
/// or the counts overflow.
pub fn ketene_mass(carbon: u32, double_bonds: u32) -> Result<f64, FormulaError> {
    let (c, h) = chain_counts(carbon, double_bonds, -2)?;
    Composition::chnops(c, h, 0, 1, 0, 0).mass()
}

/// Free fatty acid
///
/// # Errors
///
/// Returns an error when the double-bond count leaves a negative hydrogen count
/// or the counts overflow.
pub fn fatty_acid_mass(carbon: u32, double_bonds: u32) -> Result<f64, FormulaError> {
    fatty_acid_composition(carbon, double_bonds)?.mass()
}

/// Fatty alcohol R-OH released from an ether-linked chain: CnH(2n-2d+2)O
///
/// # Errors
///
/// Returns an error when the double-bond count leaves a negative hydrogen count
/// or the counts overflow.
pub fn fatty_alcohol_mass(carbon: u32, double_bonds: u32) -> Result<f64, FormulaError> {
    let (c, h) = chain_counts(carbon, double_bonds, 2)?;
    Composition::chnops(c, h, 0, 1, 0, 0).mass()
}

/// Free sphingoid base: CnH(2n+3-2d)NOk
///
/// # Errors
///
/// Returns an error when the double-bond count leaves a negative hydrogen count
/// or the counts overflow.
pub fn sphingoid_base_mass(
    carbon: u32,
    double_bonds: u32,
    hydroxyls: u32,
) -> Result<f64, FormulaError> {
    let (c, h) = chain_counts(carbon, double_bonds, 3)?;
    let o = i32::try_from(hydroxyls).map_err(|_| FormulaError::Overflow {
        carbon,
        double_bonds,
    })?;
    Composition::chnops(c, h, 1, o, 0, 0).mass()
}
