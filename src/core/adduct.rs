use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chemistry::constants::{
    ACETIC_ACID, AMMONIA, ELECTRON, FORMIC_ACID, POTASSIUM, PROTON, SODIUM, WATER,
};
use crate::core::types::IonMode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdductError {
    #[error("Unknown adduct: '{0}'")]
    Unknown(String),
}

/// Singly charged ionization forms understood by the class rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Adduct {
    /// `[M+H]+`
    Protonated,
    /// `[M+NH4]+`
    Ammoniated,
    /// `[M+Na]+`
    Sodiated,
    /// `[M+K]+`
    Potassiated,
    /// `[M+H-H2O]+`
    ProtonatedMinusWater,
    /// `[M-H]-`
    Deprotonated,
    /// `[M+HCOO]-`
    Formate,
    /// `[M+CH3COO]-`
    Acetate,
}

impl Adduct {
    pub const ALL: [Self; 8] = [
        Self::Protonated,
        Self::Ammoniated,
        Self::Sodiated,
        Self::Potassiated,
        Self::ProtonatedMinusWater,
        Self::Deprotonated,
        Self::Formate,
        Self::Acetate,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Protonated => "[M+H]+",
            Self::Ammoniated => "[M+NH4]+",
            Self::Sodiated => "[M+Na]+",
            Self::Potassiated => "[M+K]+",
            Self::ProtonatedMinusWater => "[M+H-H2O]+",
            Self::Deprotonated => "[M-H]-",
            Self::Formate => "[M+HCOO]-",
            Self::Acetate => "[M+CH3COO]-",
        }
    }

    #[must_use]
    pub fn ion_mode(self) -> IonMode {
        match self {
            Self::Deprotonated | Self::Formate | Self::Acetate => IonMode::Negative,
            _ => IonMode::Positive,
        }
    }

    /// Mass added to the neutral molecule to reach the precursor m/z
    #[must_use]
    pub fn mass_shift(self) -> f64 {
        match self {
            Self::Protonated => PROTON,
            Self::Ammoniated => AMMONIA + PROTON,
            Self::Sodiated => SODIUM - ELECTRON,
            Self::Potassiated => POTASSIUM - ELECTRON,
            Self::ProtonatedMinusWater => PROTON - WATER,
            Self::Deprotonated => -PROTON,
            Self::Formate => FORMIC_ACID - PROTON,
            Self::Acetate => ACETIC_ACID - PROTON,
        }
    }

    #[must_use]
    pub fn precursor_mz(self, neutral_mass: f64) -> f64 {
        neutral_mass + self.mass_shift()
    }

    #[must_use]
    pub fn neutral_mass(self, precursor_mz: f64) -> f64 {
        precursor_mz - self.mass_shift()
    }
}

impl std::fmt::Display for Adduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Adduct {
    type Err = AdductError;

    /// Accepts the bracketed form (`[M+H]+`), an explicit charge count
    /// (`[M+H]1+`) and the bare form (`M+H`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let core = compact
            .trim_start_matches('[')
            .trim_end_matches(['+', '-'])
            .trim_end_matches('1')
            .trim_end_matches(']');

        let adduct = match core {
            "M+H" => Self::Protonated,
            "M+NH4" => Self::Ammoniated,
            "M+Na" => Self::Sodiated,
            "M+K" => Self::Potassiated,
            "M+H-H2O" | "M-H2O+H" => Self::ProtonatedMinusWater,
            "M-H" => Self::Deprotonated,
            "M+HCOO" | "M+FA-H" | "M+CHO2" => Self::Formate,
            "M+CH3COO" | "M+Hac-H" | "M+C2H3O2" => Self::Acetate,
            _ => return Err(AdductError::Unknown(s.to_string())),
        };
        Ok(adduct)
    }
}

impl TryFrom<String> for Adduct {
    type Error = AdductError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Adduct> for String {
    fn from(adduct: Adduct) -> Self {
        adduct.name().to_string()
    }
}
