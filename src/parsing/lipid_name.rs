//! Lipid shorthand name parser.
//!
//! | Form | Example | Chains |
//! |------|---------|--------|
//! | class only | `PC` | none |
//! | sum composition | `PC 34:1`, `PC O-34:1`, `SM 34:1;2O`, `SM d34:1` | total |
//! | molecular species | `PC 16:0_18:1`, `TG 16:0_18:1_18:2` | unordered |
//! | sn-positions | `PC 16:0/18:1(9Z)`, `SM d18:1/16:0` | positional |
//!
//! The first chain of a sphingolipid is its sphingoid base. Sphingolipid names
//! without an oxidation suffix are read as dihydroxy bases.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::chain::{Chain, ChainSet};
use crate::core::types::{ChainKind, LipidClass};
use crate::utils::validation::validate_chain_set;

/// Hydroxyl count assumed for sphingoid bases written without one
pub const DEFAULT_SPHINGOID_HYDROXYLS: u32 = 2;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<header>[A-Za-z][A-Za-z_]*)(?:\s+(?P<body>\S.*))?$")
        .expect("valid name pattern")
});

static CHAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<ether>O-)?(?P<base>[mdt])?(?P<carbon>\d+):(?P<db>\d+)(?:\((?P<positions>[^)]*)\))?(?:;(?P<ox>\d*O\d*))?$",
    )
    .expect("valid chain pattern")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameParseError {
    #[error("Empty lipid name")]
    Empty,

    #[error("Unrecognized lipid name: '{0}'")]
    Malformed(String),

    #[error("Unknown lipid class '{header}' in '{name}'")]
    UnknownClass { name: String, header: String },

    #[error("Invalid chain '{chain}' in '{name}'")]
    InvalidChain { name: String, chain: String },

    #[error("Mixed '/' and '_' separators in '{0}'")]
    MixedSeparators(String),

    #[error("Chain counts out of range in '{name}': {reason}")]
    OutOfRange { name: String, reason: String },
}

/// Class and chain composition read from a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub class: LipidClass,
    pub chains: ChainSet,
}

/// One chain token before its kind is known
struct ChainToken {
    ether: bool,
    hydroxyls: Option<u32>,
    carbon: u32,
    double_bonds: u32,
    positions: Vec<u8>,
}

fn parse_oxidation(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        Some(1)
    } else {
        digits.parse().ok()
    }
}

fn parse_positions(text: &str) -> Option<Vec<u8>> {
    text.split(',')
        .map(|p| {
            let digits: String = p.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .collect()
}

fn parse_chain_token(token: &str) -> Option<ChainToken> {
    let caps = CHAIN_RE.captures(token.trim())?;
    let base_hydroxyls = caps.name("base").map(|m| match m.as_str() {
        "m" => 1,
        "d" => 2,
        _ => 3,
    });
    let suffix_hydroxyls = match caps.name("ox") {
        Some(m) => Some(parse_oxidation(m.as_str())?),
        None => None,
    };
    let positions = match caps.name("positions") {
        Some(m) if !m.as_str().trim().is_empty() => parse_positions(m.as_str())?,
        _ => Vec::new(),
    };
    Some(ChainToken {
        ether: caps.name("ether").is_some(),
        hydroxyls: suffix_hydroxyls.or(base_hydroxyls),
        carbon: caps["carbon"].parse().ok()?,
        double_bonds: caps["db"].parse().ok()?,
        positions,
    })
}

/// Parse a lipid shorthand name into its class and chain composition
///
/// # Errors
///
/// Returns an error if the name is empty, the class is not recognized, or a
/// chain token cannot be read.
pub fn parse_lipid_name(name: &str) -> Result<ParsedName, NameParseError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameParseError::Empty);
    }
    let caps = NAME_RE
        .captures(name)
        .ok_or_else(|| NameParseError::Malformed(name.to_string()))?;
    let header = &caps["header"];

    let Some(body) = caps.name("body").map(|m| m.as_str().trim()) else {
        let class = LipidClass::from_header(header, false).ok_or_else(|| {
            NameParseError::UnknownClass {
                name: name.to_string(),
                header: header.to_string(),
            }
        })?;
        return Ok(ParsedName {
            class,
            chains: ChainSet::total(0, 0, 0),
        });
    };

    if body.contains('/') && body.contains('_') {
        return Err(NameParseError::MixedSeparators(name.to_string()));
    }
    let positional = body.contains('/');
    let raw_tokens: Vec<&str> = body.split(['/', '_']).collect();

    let tokens = raw_tokens
        .iter()
        .map(|token| {
            parse_chain_token(token).ok_or_else(|| NameParseError::InvalidChain {
                name: name.to_string(),
                chain: (*token).to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let ether = tokens.iter().any(|t| t.ether);
    let class = LipidClass::from_header(header, ether).ok_or_else(|| {
        NameParseError::UnknownClass {
            name: name.to_string(),
            header: header.to_string(),
        }
    })?;
    let sphingolipid = class.is_sphingolipid();

    if let [token] = tokens.as_slice() {
        if !is_single_chain_class(class) {
            let oxidized = match token.hydroxyls {
                Some(count) => count,
                None if sphingolipid => DEFAULT_SPHINGOID_HYDROXYLS,
                None => 0,
            };
            return checked(
                name,
                class,
                ChainSet::total(token.carbon, token.double_bonds, oxidized),
            );
        }
    }

    let chains = tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| {
            let kind = if sphingolipid && index == 0 {
                ChainKind::Sphingoid
            } else if token.ether {
                ChainKind::Alkyl
            } else {
                ChainKind::Acyl
            };
            let oxidized = match (kind, token.hydroxyls) {
                (_, Some(count)) => count,
                (ChainKind::Sphingoid, None) => DEFAULT_SPHINGOID_HYDROXYLS,
                _ => 0,
            };
            Chain::new(kind, token.carbon, token.double_bonds)
                .with_oxidized(oxidized)
                .with_double_bond_positions(token.positions)
        })
        .collect();

    checked(name, class, ChainSet::separated(chains, positional))
}

fn checked(name: &str, class: LipidClass, chains: ChainSet) -> Result<ParsedName, NameParseError> {
    validate_chain_set(&chains).map_err(|e| NameParseError::OutOfRange {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(ParsedName { class, chains })
}

/// Classes whose only chain is fully determined by a sum composition
fn is_single_chain_class(class: LipidClass) -> bool {
    matches!(
        class,
        LipidClass::Lpc | LipidClass::Lpe | LipidClass::Ce | LipidClass::Car
    )
}
