use serde::{Deserialize, Serialize};

/// Lipid classes with a registered characterization rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LipidClass {
    #[serde(rename = "PC")]
    Pc,
    #[serde(rename = "PE")]
    Pe,
    #[serde(rename = "PS")]
    Ps,
    #[serde(rename = "PG")]
    Pg,
    #[serde(rename = "PI")]
    Pi,
    #[serde(rename = "PA")]
    Pa,
    #[serde(rename = "LPC")]
    Lpc,
    #[serde(rename = "LPE")]
    Lpe,
    #[serde(rename = "EtherPC")]
    EtherPc,
    #[serde(rename = "EtherPE")]
    EtherPe,
    #[serde(rename = "SM")]
    Sm,
    #[serde(rename = "Cer_NS")]
    CerNs,
    #[serde(rename = "TG")]
    Tg,
    #[serde(rename = "DG")]
    Dg,
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "CAR")]
    Car,
}

impl LipidClass {
    pub const ALL: [Self; 16] = [
        Self::Pc,
        Self::Pe,
        Self::Ps,
        Self::Pg,
        Self::Pi,
        Self::Pa,
        Self::Lpc,
        Self::Lpe,
        Self::EtherPc,
        Self::EtherPe,
        Self::Sm,
        Self::CerNs,
        Self::Tg,
        Self::Dg,
        Self::Ce,
        Self::Car,
    ];

    /// Abbreviation used at the start of a lipid name
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Pc | Self::EtherPc => "PC",
            Self::Pe | Self::EtherPe => "PE",
            Self::Ps => "PS",
            Self::Pg => "PG",
            Self::Pi => "PI",
            Self::Pa => "PA",
            Self::Lpc => "LPC",
            Self::Lpe => "LPE",
            Self::Sm => "SM",
            Self::CerNs => "Cer",
            Self::Tg => "TG",
            Self::Dg => "DG",
            Self::Ce => "CE",
            Self::Car => "CAR",
        }
    }

    #[must_use]
    pub fn is_ether(self) -> bool {
        matches!(self, Self::EtherPc | Self::EtherPe)
    }

    #[must_use]
    pub fn is_sphingolipid(self) -> bool {
        matches!(self, Self::Sm | Self::CerNs)
    }

    /// Resolve a name header (`PC`, `Cer`, ...) plus ether flag to a class
    #[must_use]
    pub fn from_header(header: &str, ether: bool) -> Option<Self> {
        let class = match header {
            "PC" if ether => Self::EtherPc,
            "PE" if ether => Self::EtherPe,
            "PC" => Self::Pc,
            "PE" => Self::Pe,
            "PS" => Self::Ps,
            "PG" => Self::Pg,
            "PI" => Self::Pi,
            "PA" => Self::Pa,
            "LPC" => Self::Lpc,
            "LPE" => Self::Lpe,
            "SM" => Self::Sm,
            "Cer" | "Cer_NS" => Self::CerNs,
            "TG" | "TAG" => Self::Tg,
            "DG" | "DAG" => Self::Dg,
            "CE" => Self::Ce,
            "CAR" => Self::Car,
            _ => return None,
        };
        if ether && !class.is_ether() {
            return None;
        }
        Some(class)
    }
}

impl std::fmt::Display for LipidClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EtherPc => write!(f, "EtherPC"),
            Self::EtherPe => write!(f, "EtherPE"),
            Self::CerNs => write!(f, "Cer_NS"),
            other => write!(f, "{}", other.header()),
        }
    }
}

/// Polarity of the acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IonMode {
    Positive,
    Negative,
}

impl std::fmt::Display for IonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// How a chain is linked to the backbone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainKind {
    /// Sphingoid base of a sphingolipid
    Sphingoid,
    /// Ether-linked chain (plasmanyl)
    Alkyl,
    /// Ester-linked fatty acyl
    Acyl,
}

/// Structural resolution of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    /// Class confirmed, no chain information available
    Class,
    /// Class and summed chain composition
    SumComposition,
    /// Individual chains known, positions unordered
    MolecularSpecies,
    /// Chains assigned to sn-positions
    Position,
}

impl AnnotationLevel {
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Class => 0,
            Self::SumComposition => 1,
            Self::MolecularSpecies => 2,
            Self::Position => 3,
        }
    }
}

impl std::fmt::Display for AnnotationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Which peak channel abundance thresholds are compared against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBasis {
    /// Raw (or normalized) peak intensity
    #[default]
    Intensity,
    /// Secondary channel carried alongside each peak
    Resolution,
}
