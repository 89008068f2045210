//! Parsers for library files, query spectra and lipid names.
//!
//! This module provides parsers for:
//!
//! - **Lipid names**: shorthand notation such as `PC 34:1`, `PC 16:0_18:1`,
//!   `PC 16:0/18:1(9Z)`, `PC O-34:1` or `SM 18:1;2O/16:0`
//! - **Libraries**: tab- or comma-delimited `name, m/z, adduct` text, or JSON
//! - **Query spectra**: JSON arrays and MGF files
//!
//! Any input file may be gzip-compressed.
//!
//! ## Example
//!
//! ```rust
//! use lipid_solver::parsing::lipid_name::parse_lipid_name;
//! use lipid_solver::core::types::LipidClass;
//!
//! let parsed = parse_lipid_name("PC 16:0_18:1").unwrap();
//! assert_eq!(parsed.class, LipidClass::Pc);
//! assert_eq!(parsed.chains.totals().carbon, 34);
//! ```
//!
//! ## Library columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | name   | Lipid name; class and chains are derived from it | Yes |
//! | m/z    | Theoretical precursor m/z | Yes |
//! | adduct | Adduct string, e.g. `[M+H]+` | Yes |

pub mod library;
pub mod lipid_name;
pub mod spectrum;

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a text file, transparently decompressing gzip content
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut text)?;
        return Ok(text);
    }
    String::from_utf8(bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Path without a trailing `.gz`, used for extension-based format detection
#[must_use]
pub fn strip_gz(path: &Path) -> String {
    let name = path.to_string_lossy().to_lowercase();
    name.strip_suffix(".gz").map(str::to_string).unwrap_or(name)
}
