//! Class-specific characterization rules.
//!
//! Every lipid class registers one [`ClassRule`] in a [`RuleRegistry`]. A rule
//! looks at one library entry and the observed spectrum and returns a
//! [`RuleOutcome`]: either the candidate annotations it supports, or the reason
//! it rejected the entry.
//!
//! The built-in rules share one skeleton, [`ClassTemplate`]:
//!
//! 1. compute diagnostic m/z values from the precursor and known neutral losses
//! 2. reject unless every gate ion is present and no competing-class ion is
//! 3. score fully specified entries directly, otherwise enumerate chain splits
//! 4. keep the splits with enough chain fragments, or fall back to the sum
//!    composition
//!
//! | Rule set | Classes |
//! |----------|---------|
//! | glycerophospholipids | PC, PE, PS, PG, PI, PA, LPC, LPE, PC O-, PE O- |
//! | glycerolipids | TG, DG |
//! | sphingolipids | SM, Cer NS |
//! | other | CE, CAR |

use std::collections::HashMap;

use serde::Serialize;

use crate::core::adduct::Adduct;
use crate::core::molecule::{LipidMolecule, ReferenceMolecule};
use crate::core::peak::SpectrumPeak;
use crate::core::types::LipidClass;
use crate::matching::engine::AnnotationConfig;

mod glycerolipid;
mod glycerophospholipid;
mod other;
mod sphingolipid;
pub mod template;

pub use template::{AdductBranch, ChainFragment, ClassTemplate, DiagnosticTarget, Exclusion, Gate};

/// Inputs shared by every rule evaluation
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Observed peaks, already normalized if the caller asked for it
    pub spectrum: &'a [SpectrumPeak],
    pub reference: &'a ReferenceMolecule,
    pub config: &'a AnnotationConfig,
}

/// Why a rule declined a library entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    EmptySpectrum,
    UnsupportedAdduct { adduct: Adduct },
    MissingDiagnosticIon { mz: f64 },
    CompetingClassIon { class: LipidClass, mz: f64 },
    RequiredIonMissing { mz: f64 },
    InsufficientChainIons,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySpectrum => write!(f, "empty spectrum"),
            Self::UnsupportedAdduct { adduct } => write!(f, "no rule for adduct {adduct}"),
            Self::MissingDiagnosticIon { mz } => write!(f, "diagnostic ion {mz:.4} not found"),
            Self::CompetingClassIon { class, mz } => {
                write!(f, "{class} ion {mz:.4} present")
            }
            Self::RequiredIonMissing { mz } => {
                write!(f, "required reference ion {mz:.4} not found")
            }
            Self::InsufficientChainIons => write!(f, "too few chain fragments"),
        }
    }
}

/// Result of evaluating one rule against one library entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RuleOutcome {
    /// Candidates ordered best first; never empty
    Matched(Vec<LipidMolecule>),
    NoMatch(Rejection),
}

impl RuleOutcome {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Best candidate, if the rule matched
    #[must_use]
    pub fn best(&self) -> Option<&LipidMolecule> {
        match self {
            Self::Matched(candidates) => candidates.first(),
            Self::NoMatch(_) => None,
        }
    }

    #[must_use]
    pub fn into_candidates(self) -> Vec<LipidMolecule> {
        match self {
            Self::Matched(candidates) => candidates,
            Self::NoMatch(_) => Vec::new(),
        }
    }
}

/// Characterization logic for one lipid class
pub trait ClassRule: Send + Sync {
    fn class(&self) -> LipidClass;

    /// Adducts this rule can evaluate
    fn adducts(&self) -> Vec<Adduct>;

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome;
}

/// Lookup from lipid class to its rule
pub struct RuleRegistry {
    rules: HashMap<LipidClass, Box<dyn ClassRule>>,
}

impl RuleRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Registry holding every built-in class rule
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for template in glycerophospholipid::templates()
            .into_iter()
            .chain(glycerolipid::templates())
            .chain(sphingolipid::templates())
            .chain(other::templates())
        {
            registry.register(Box::new(template));
        }
        registry
    }

    /// Add a rule, replacing any rule already registered for its class
    pub fn register(&mut self, rule: Box<dyn ClassRule>) {
        self.rules.insert(rule.class(), rule);
    }

    #[must_use]
    pub fn get(&self, class: LipidClass) -> Option<&dyn ClassRule> {
        self.rules.get(&class).map(AsRef::as_ref)
    }

    /// Registered classes in declaration order
    #[must_use]
    pub fn classes(&self) -> Vec<LipidClass> {
        let mut classes: Vec<_> = self.rules.keys().copied().collect();
        classes.sort_unstable();
        classes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}
