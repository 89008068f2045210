//! Centralized validation and helper functions.

use thiserror::Error;

use crate::core::chain::ChainSet;

/// Maximum number of entries allowed in a single library file (DOS protection)
pub const MAX_LIBRARY_ENTRIES: usize = 2_000_000;

/// Maximum number of peaks allowed in a single query spectrum
pub const MAX_PEAKS: usize = 100_000;

/// Maximum number of spectra allowed in a single query file
pub const MAX_SPECTRA: usize = 1_000_000;

/// Widest tolerance accepted for either mass window, in Da
pub const MAX_TOLERANCE: f64 = 1.0;

/// Most carbons accepted in one chain or in a lipid's summed chains
pub const MAX_CHAIN_CARBON: u32 = 200;

/// Most double bonds accepted in one chain or in a lipid's summed chains
pub const MAX_CHAIN_DOUBLE_BONDS: u32 = 64;

/// Check if adding another library entry would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new entry.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_entry_limit(count: usize) -> Option<String> {
    if count >= MAX_LIBRARY_ENTRIES {
        Some(format!(
            "Too many library entries: adding another would exceed maximum of {MAX_LIBRARY_ENTRIES}"
        ))
    } else {
        None
    }
}

/// Check if adding another peak would exceed [`MAX_PEAKS`].
#[must_use]
pub fn check_peak_limit(count: usize) -> Option<String> {
    if count >= MAX_PEAKS {
        Some(format!(
            "Too many peaks: adding another would exceed maximum of {MAX_PEAKS}"
        ))
    } else {
        None
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{name} must be a finite positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} of {value} exceeds maximum of {MAX_TOLERANCE}")]
    ToleranceTooWide { name: &'static str, value: f64 },

    #[error("{name} must be a finite non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{value} {name} exceeds maximum of {max}")]
    ChainCountTooLarge {
        name: &'static str,
        value: u32,
        max: u32,
    },
}

/// Validate the carbon and double-bond counts of a chain or chain total
///
/// # Errors
///
/// Returns an error if either count exceeds [`MAX_CHAIN_CARBON`] or
/// [`MAX_CHAIN_DOUBLE_BONDS`].
pub fn validate_chain_counts(carbon: u32, double_bonds: u32) -> Result<(), ValidationError> {
    if carbon > MAX_CHAIN_CARBON {
        return Err(ValidationError::ChainCountTooLarge {
            name: "carbons",
            value: carbon,
            max: MAX_CHAIN_CARBON,
        });
    }
    if double_bonds > MAX_CHAIN_DOUBLE_BONDS {
        return Err(ValidationError::ChainCountTooLarge {
            name: "double bonds",
            value: double_bonds,
            max: MAX_CHAIN_DOUBLE_BONDS,
        });
    }
    Ok(())
}

/// Validate every chain of a composition and its totals
///
/// # Errors
///
/// Returns the first count that exceeds its limit.
pub fn validate_chain_set(chains: &ChainSet) -> Result<(), ValidationError> {
    for chain in chains.chains().unwrap_or_default() {
        validate_chain_counts(chain.carbon, chain.double_bonds)?;
    }
    let totals = chains.totals();
    validate_chain_counts(totals.carbon, totals.double_bonds)
}

/// Validate a mass tolerance in Da
///
/// # Errors
///
/// Returns an error if the tolerance is not finite, not positive, or wider
/// than [`MAX_TOLERANCE`].
pub fn validate_tolerance(name: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NonPositive { name, value });
    }
    if value > MAX_TOLERANCE {
        return Err(ValidationError::ToleranceTooWide { name, value });
    }
    Ok(value)
}

/// Validate an abundance threshold
///
/// # Errors
///
/// Returns an error if the threshold is negative or not finite.
pub fn validate_threshold(name: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::Negative { name, value });
    }
    Ok(value)
}
