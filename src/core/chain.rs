use serde::{Deserialize, Serialize};

use crate::core::types::{AnnotationLevel, ChainKind, LipidClass};

/// A single acyl, alkyl or sphingoid chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain {
    pub kind: ChainKind,

    pub carbon: u32,

    pub double_bonds: u32,

    /// Number of additional oxygens (hydroxyls for sphingoid bases)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub oxidized: u32,

    /// Double-bond locations counted from the carboxyl end, when known
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub double_bond_positions: Vec<u8>,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl Chain {
    #[must_use]
    pub fn new(kind: ChainKind, carbon: u32, double_bonds: u32) -> Self {
        Self {
            kind,
            carbon,
            double_bonds,
            oxidized: 0,
            double_bond_positions: Vec::new(),
        }
    }

    #[must_use]
    pub fn acyl(carbon: u32, double_bonds: u32) -> Self {
        Self::new(ChainKind::Acyl, carbon, double_bonds)
    }

    #[must_use]
    pub fn alkyl(carbon: u32, double_bonds: u32) -> Self {
        Self::new(ChainKind::Alkyl, carbon, double_bonds)
    }

    #[must_use]
    pub fn sphingoid(carbon: u32, double_bonds: u32, hydroxyls: u32) -> Self {
        Self::new(ChainKind::Sphingoid, carbon, double_bonds).with_oxidized(hydroxyls)
    }

    #[must_use]
    pub fn with_oxidized(mut self, oxidized: u32) -> Self {
        self.oxidized = oxidized;
        self
    }

    #[must_use]
    pub fn with_double_bond_positions(mut self, positions: Vec<u8>) -> Self {
        self.double_bond_positions = positions;
        self
    }

    #[must_use]
    pub fn without_double_bond_positions(&self) -> Self {
        Self {
            double_bond_positions: Vec::new(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn has_double_bond_positions(&self) -> bool {
        !self.double_bond_positions.is_empty()
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == ChainKind::Alkyl {
            write!(f, "O-")?;
        }
        write!(f, "{}:{}", self.carbon, self.double_bonds)?;
        if self.has_double_bond_positions() {
            let positions: Vec<String> = self
                .double_bond_positions
                .iter()
                .map(ToString::to_string)
                .collect();
            write!(f, "({})", positions.join(","))?;
        }
        write_oxidation(f, self.oxidized)
    }
}

fn write_oxidation(f: &mut std::fmt::Formatter<'_>, oxidized: u32) -> std::fmt::Result {
    match oxidized {
        0 => Ok(()),
        1 => write!(f, ";O"),
        n => write!(f, ";{n}O"),
    }
}

/// Chain counts summed over all positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TotalChain {
    pub carbon: u32,
    pub double_bonds: u32,
    #[serde(default)]
    pub oxidized: u32,
}

impl TotalChain {
    #[must_use]
    pub fn new(carbon: u32, double_bonds: u32, oxidized: u32) -> Self {
        Self {
            carbon,
            double_bonds,
            oxidized,
        }
    }
}

/// Chain composition of a molecule, either summed or resolved per position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChainSet {
    /// Unresolved split; only the sums are known
    Total(TotalChain),
    /// One chain per position. `positional` marks sn-assigned order.
    Separated { chains: Vec<Chain>, positional: bool },
}

impl ChainSet {
    #[must_use]
    pub fn total(carbon: u32, double_bonds: u32, oxidized: u32) -> Self {
        Self::Total(TotalChain::new(carbon, double_bonds, oxidized))
    }

    #[must_use]
    pub fn separated(chains: Vec<Chain>, positional: bool) -> Self {
        Self::Separated { chains, positional }
    }

    /// Summed counts; for separated chains these are derived, so they always
    /// agree with the per-position values.
    #[must_use]
    pub fn totals(&self) -> TotalChain {
        match self {
            Self::Total(total) => *total,
            Self::Separated { chains, .. } => chains.iter().fold(TotalChain::default(), |acc, c| {
                TotalChain::new(
                    acc.carbon.saturating_add(c.carbon),
                    acc.double_bonds.saturating_add(c.double_bonds),
                    acc.oxidized.saturating_add(c.oxidized),
                )
            }),
        }
    }

    #[must_use]
    pub fn chains(&self) -> Option<&[Chain]> {
        match self {
            Self::Total(_) => None,
            Self::Separated { chains, .. } => Some(chains),
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Separated { .. })
    }

    #[must_use]
    pub fn is_positional(&self) -> bool {
        matches!(self, Self::Separated { positional: true, .. })
    }

    /// Annotation level implied by how much of the composition is known
    #[must_use]
    pub fn level(&self) -> AnnotationLevel {
        match self {
            Self::Separated {
                positional: true, ..
            } => AnnotationLevel::Position,
            Self::Separated { .. } => AnnotationLevel::MolecularSpecies,
            Self::Total(total) if total.carbon == 0 => AnnotationLevel::Class,
            Self::Total(_) => AnnotationLevel::SumComposition,
        }
    }

    /// Same chains with sn-order dropped
    #[must_use]
    pub fn unordered(&self) -> Self {
        match self {
            Self::Total(total) => Self::Total(*total),
            Self::Separated { chains, .. } => Self::separated(chains.clone(), false),
        }
    }

    /// Same chains with double-bond locations dropped
    #[must_use]
    pub fn without_double_bond_positions(&self) -> Self {
        match self {
            Self::Total(total) => Self::Total(*total),
            Self::Separated { chains, positional } => Self::separated(
                chains
                    .iter()
                    .map(Chain::without_double_bond_positions)
                    .collect(),
                *positional,
            ),
        }
    }

    /// Collapse to the summed composition
    #[must_use]
    pub fn summed(&self) -> Self {
        Self::Total(self.totals())
    }

    /// Key under which two unordered splits are the same molecular species.
    /// Chains of different kinds keep their relative order.
    #[must_use]
    pub fn species_key(&self) -> Vec<(ChainKind, u32, u32, u32)> {
        let mut key: Vec<_> = self
            .chains()
            .unwrap_or_default()
            .iter()
            .map(|c| (c.kind, c.carbon, c.double_bonds, c.oxidized))
            .collect();
        key.sort_unstable();
        key
    }

    #[must_use]
    pub fn has_double_bond_positions(&self) -> bool {
        self.chains()
            .is_some_and(|chains| chains.iter().any(Chain::has_double_bond_positions))
    }
}

/// Format a lipid name from a class and chain composition.
///
/// # Examples
///
/// ```
/// use lipid_solver::core::chain::{format_lipid_name, Chain, ChainSet};
/// use lipid_solver::core::types::LipidClass;
///
/// let total = ChainSet::total(34, 1, 0);
/// assert_eq!(format_lipid_name(LipidClass::Pc, &total), "PC 34:1");
///
/// let split = ChainSet::separated(vec![Chain::acyl(16, 0), Chain::acyl(18, 1)], true);
/// assert_eq!(format_lipid_name(LipidClass::Pc, &split), "PC 16:0/18:1");
/// ```
#[must_use]
pub fn format_lipid_name(class: LipidClass, chains: &ChainSet) -> String {
    match chains {
        ChainSet::Total(total) => {
            if total.carbon == 0 {
                return class.header().to_string();
            }
            let prefix = if class.is_ether() { "O-" } else { "" };
            let oxidation = match total.oxidized {
                0 => String::new(),
                1 => ";O".to_string(),
                n => format!(";{n}O"),
            };
            format!(
                "{} {prefix}{}:{}{oxidation}",
                class.header(),
                total.carbon,
                total.double_bonds
            )
        }
        ChainSet::Separated { chains, positional } => {
            let separator = if *positional { "/" } else { "_" };
            let labels: Vec<String> = chains.iter().map(ToString::to_string).collect();
            format!("{} {}", class.header(), labels.join(separator))
        }
    }
}
