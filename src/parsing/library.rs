use std::path::Path;

use thiserror::Error;
use tracing::warn;

use super::lipid_name::parse_lipid_name;
use super::strip_gz;
use crate::core::adduct::Adduct;
use crate::core::molecule::ReferenceMolecule;
use crate::utils::validation::check_entry_limit;

#[derive(Error, Debug)]
pub enum LibraryParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many library entries: {0}")]
    TooManyEntries(usize),
}

/// On-disk library layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFormat {
    Json,
    Tsv,
    Csv,
}

impl LibraryFormat {
    /// Pick a format from the file extension, falling back to the content
    #[must_use]
    pub fn detect(path: &Path, content: &str) -> Self {
        let name = strip_gz(path);
        if name.ends_with(".json") {
            return Self::Json;
        }
        if name.ends_with(".csv") {
            return Self::Csv;
        }
        if name.ends_with(".tsv") || name.ends_with(".txt") {
            return Self::Tsv;
        }

        let first = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .unwrap_or_default();
        if first.starts_with('{') || first.starts_with('[') {
            Self::Json
        } else if !first.contains('\t') && first.contains(',') {
            Self::Csv
        } else {
            Self::Tsv
        }
    }

    #[must_use]
    pub fn delimiter(self) -> char {
        match self {
            Self::Csv => ',',
            Self::Json | Self::Tsv => '\t',
        }
    }
}

/// Parse delimited library text with columns: name, m/z, adduct
///
/// Lines whose name or adduct is not recognized are skipped with a warning.
///
/// # Errors
///
/// Returns `LibraryParseError::InvalidFormat` if a line has fewer than three
/// fields, an m/z is not a positive number, or no entries are found, or
/// `LibraryParseError::TooManyEntries` if the limit is exceeded.
pub fn parse_library_text(
    text: &str,
    format: LibraryFormat,
) -> Result<Vec<ReferenceMolecule>, LibraryParseError> {
    let delimiter = format.delimiter();
    let mut entries = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if matches!(first.as_str(), "name" | "lipid" | "metabolite") {
                continue;
            }
        }

        let line_num = i + 1;

        if fields.len() < 3 {
            return Err(LibraryParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 3 fields"
            )));
        }

        let mz: f64 = fields[1]
            .parse()
            .ok()
            .filter(|mz: &f64| mz.is_finite() && *mz > 0.0)
            .ok_or_else(|| {
                LibraryParseError::InvalidFormat(format!(
                    "Invalid m/z on line {}: '{}'",
                    line_num, fields[1]
                ))
            })?;

        let parsed = match parse_lipid_name(fields[0]) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping library line {}: {}", line_num, e);
                continue;
            }
        };
        let adduct: Adduct = match fields[2].parse() {
            Ok(adduct) => adduct,
            Err(e) => {
                warn!("Skipping library line {}: {}", line_num, e);
                continue;
            }
        };

        if check_entry_limit(entries.len()).is_some() {
            return Err(LibraryParseError::TooManyEntries(entries.len()));
        }

        entries.push(ReferenceMolecule::new(
            fields[0],
            parsed.class,
            adduct,
            mz,
            parsed.chains,
        ));
    }

    if entries.is_empty() {
        return Err(LibraryParseError::InvalidFormat(
            "No library entries found in file".to_string(),
        ));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::ChainSet;
    use crate::core::types::LipidClass;

    #[test]
    fn test_parse_tsv_library() {
        let tsv = "name\tmz\tadduct
# phosphatidylcholines
PC 34:1\t760.585082\t[M+H]+
PE 34:1\t716.523579\t[M-H]-
SM 34:1;2O\t703.574851\t[M+H]+
";
        let entries = parse_library_text(tsv, LibraryFormat::Tsv).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].class, LipidClass::Pc);
        assert_eq!(entries[0].adduct, Adduct::Protonated);
        assert!((entries[0].mz - 760.585_082).abs() < 1e-9);
        assert_eq!(entries[1].adduct, Adduct::Deprotonated);
        assert_eq!(entries[2].chains, ChainSet::total(34, 1, 2));
    }

    #[test]
    fn test_parse_csv_library() {
        let csv = "PC 16:0_18:1,760.585082,[M+H]+\nTG 52:2,876.801467,[M+NH4]+\n";
        let entries = parse_library_text(csv, LibraryFormat::Csv).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].chains.is_resolved());
        assert_eq!(entries[1].adduct, Adduct::Ammoniated);
    }

    #[test]
    fn test_unknown_entries_skipped() {
        let tsv = "XYZ 34:1\t760.0\t[M+H]+\nPC 34:1\t760.585\t[M+Q]+\nPC 34:1\t760.585\t[M+H]+\n";
        let entries = parse_library_text(tsv, LibraryFormat::Tsv).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_invalid_lines() {
        assert!(matches!(
            parse_library_text("PC 34:1\t760.585\n", LibraryFormat::Tsv),
            Err(LibraryParseError::InvalidFormat(_))
        ));
        let err = parse_library_text("PC 34:1\tabc\t[M+H]+\n", LibraryFormat::Tsv).unwrap_err();
        assert!(err.to_string().contains("line 1"));
        assert!(matches!(
            parse_library_text("# only comments\n\n", LibraryFormat::Tsv),
            Err(LibraryParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            LibraryFormat::detect(Path::new("lib.json"), ""),
            LibraryFormat::Json
        );
        assert_eq!(
            LibraryFormat::detect(Path::new("lib.csv.gz"), ""),
            LibraryFormat::Csv
        );
        assert_eq!(
            LibraryFormat::detect(Path::new("lib"), "{\"version\": \"1.0.0\"}"),
            LibraryFormat::Json
        );
        assert_eq!(
            LibraryFormat::detect(Path::new("lib"), "PC 34:1,760.585,[M+H]+"),
            LibraryFormat::Csv
        );
        assert_eq!(
            LibraryFormat::detect(Path::new("lib"), "PC 34:1\t760.585\t[M+H]+"),
            LibraryFormat::Tsv
        );
    }
}
