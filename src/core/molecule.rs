use serde::{Deserialize, Serialize};

use crate::core::adduct::Adduct;
use crate::core::chain::{format_lipid_name, ChainSet, TotalChain};
use crate::core::peak::SpectrumPeak;
use crate::core::types::{AnnotationLevel, IonMode, LipidClass};
use crate::matching::scoring::CharacterizationResult;

/// A library entry: one lipid species observed as one adduct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMolecule {
    /// Name as written in the library
    pub name: String,

    pub class: LipidClass,

    pub adduct: Adduct,

    /// Theoretical precursor m/z
    pub mz: f64,

    pub chains: ChainSet,

    /// Theoretical fragments with role tags, for fully specified entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_spectrum: Vec<SpectrumPeak>,
}

impl ReferenceMolecule {
    pub fn new(
        name: impl Into<String>,
        class: LipidClass,
        adduct: Adduct,
        mz: f64,
        chains: ChainSet,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            adduct,
            mz,
            chains,
            reference_spectrum: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reference_spectrum(mut self, peaks: Vec<SpectrumPeak>) -> Self {
        self.reference_spectrum = peaks;
        self
    }

    #[must_use]
    pub fn ion_mode(&self) -> IonMode {
        self.adduct.ion_mode()
    }

    #[must_use]
    pub fn totals(&self) -> TotalChain {
        self.chains.totals()
    }

    #[must_use]
    pub fn total_carbon(&self) -> u32 {
        self.totals().carbon
    }

    #[must_use]
    pub fn total_double_bonds(&self) -> u32 {
        self.totals().double_bonds
    }

    #[must_use]
    pub fn total_oxidized(&self) -> u32 {
        self.totals().oxidized
    }
}

/// An annotation produced by a class rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LipidMolecule {
    pub name: String,

    pub class: LipidClass,

    pub level: AnnotationLevel,

    pub adduct: Adduct,

    /// Precursor m/z of the library entry the annotation was derived from
    pub mz: f64,

    pub chains: ChainSet,

    /// Total score from the characterization; used for ranking
    pub score: f64,

    pub matched_ion_count: usize,

    /// Mean abundance of the matched chain fragments. Ranks splits that tie on score.
    pub fragment_abundance: f64,

    pub characterization: CharacterizationResult,

    /// Name of the library entry that produced this annotation
    pub reference_name: String,
}

impl LipidMolecule {
    /// Annotation carrying a (possibly reduced) chain composition derived
    /// from a library entry. The name is rebuilt from `chains`.
    #[must_use]
    pub fn derived(
        reference: &ReferenceMolecule,
        chains: ChainSet,
        characterization: CharacterizationResult,
    ) -> Self {
        Self {
            name: format_lipid_name(reference.class, &chains),
            class: reference.class,
            level: chains.level(),
            adduct: reference.adduct,
            mz: reference.mz,
            chains,
            score: characterization.total_score,
            matched_ion_count: characterization.total_matched_ion_count,
            fragment_abundance: 0.0,
            characterization,
            reference_name: reference.name.clone(),
        }
    }

    /// Annotation that reports the library entry exactly as written
    #[must_use]
    pub fn from_reference(
        reference: &ReferenceMolecule,
        characterization: CharacterizationResult,
    ) -> Self {
        Self {
            name: reference.name.clone(),
            ..Self::derived(reference, reference.chains.clone(), characterization)
        }
    }

    #[must_use]
    pub fn with_fragment_abundance(mut self, abundance: f64) -> Self {
        self.fragment_abundance = abundance;
        self
    }
}
