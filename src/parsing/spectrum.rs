//! Query spectrum readers.
//!
//! MGF blocks are read as:
//!
//! ```text
//! BEGIN IONS
//! TITLE=scan_1021
//! PEPMASS=760.585 120000
//! RTINSECONDS=754.2
//! CHARGE=1+
//! 184.0733 1200
//! 577.5190 350
//! END IONS
//! ```
//!
//! The ion mode comes from the charge sign (or an `IONMODE=` line), and falls
//! back to the caller's default when neither is present.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::{read_text, strip_gz};
use crate::core::peak::{QuerySpectrum, SpectrumPeak};
use crate::core::types::IonMode;
use crate::utils::validation::{check_peak_limit, MAX_PEAKS, MAX_SPECTRA};

#[derive(Error, Debug)]
pub enum SpectrumParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse spectra: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many peaks in spectrum '{0}': exceeds maximum of {MAX_PEAKS}")]
    TooManyPeaks(String),

    #[error("Too many spectra: exceeds maximum of {MAX_SPECTRA}")]
    TooManySpectra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumFormat {
    Json,
    Mgf,
}

impl SpectrumFormat {
    #[must_use]
    pub fn detect(path: &Path, content: &str) -> Self {
        let name = strip_gz(path);
        if name.ends_with(".json") {
            return Self::Json;
        }
        if name.ends_with(".mgf") {
            return Self::Mgf;
        }
        if content.trim_start().starts_with('[') {
            Self::Json
        } else {
            Self::Mgf
        }
    }
}

/// Load query spectra from a JSON or MGF file, optionally gzipped
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or exceeds the
/// spectrum or peak limits.
pub fn load_spectra(
    path: &Path,
    default_mode: IonMode,
) -> Result<Vec<QuerySpectrum>, SpectrumParseError> {
    let content = read_text(path)?;
    let spectra = match SpectrumFormat::detect(path, &content) {
        SpectrumFormat::Json => parse_json_spectra(&content)?,
        SpectrumFormat::Mgf => parse_mgf_text(&content, default_mode)?,
    };
    info!("Loaded {} query spectra from {}", spectra.len(), path.display());
    Ok(spectra)
}

/// Parse a JSON array of query spectra
///
/// # Errors
///
/// Returns an error if the JSON is malformed or a spectrum exceeds the limits.
pub fn parse_json_spectra(json: &str) -> Result<Vec<QuerySpectrum>, SpectrumParseError> {
    let spectra: Vec<QuerySpectrum> = serde_json::from_str(json)?;
    if spectra.len() > MAX_SPECTRA {
        return Err(SpectrumParseError::TooManySpectra);
    }
    if let Some(spectrum) = spectra.iter().find(|s| s.peaks.len() > MAX_PEAKS) {
        return Err(SpectrumParseError::TooManyPeaks(spectrum.id.clone()));
    }
    Ok(spectra)
}

/// Header fields collected inside one `BEGIN IONS` block
#[derive(Default)]
struct MgfBlock {
    title: Option<String>,
    precursor_mz: Option<f64>,
    rt_minutes: Option<f64>,
    ion_mode: Option<IonMode>,
    peaks: Vec<SpectrumPeak>,
}

fn parse_ion_mode(value: &str) -> Option<IonMode> {
    match value.trim().to_lowercase().as_str() {
        "positive" | "pos" | "+" => Some(IonMode::Positive),
        "negative" | "neg" | "-" => Some(IonMode::Negative),
        _ => None,
    }
}

fn charge_mode(value: &str) -> Option<IonMode> {
    let value = value.trim();
    if value.ends_with('-') || value.starts_with('-') {
        Some(IonMode::Negative)
    } else if value.ends_with('+') || value.chars().all(|c| c.is_ascii_digit()) {
        Some(IonMode::Positive)
    } else {
        None
    }
}

fn parse_number(value: &str, what: &str, line_num: usize) -> Result<f64, SpectrumParseError> {
    value
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| {
            SpectrumParseError::InvalidFormat(format!(
                "Invalid {what} on line {line_num}: '{value}'"
            ))
        })
}

/// Parse MGF text into query spectra
///
/// # Errors
///
/// Returns `SpectrumParseError::InvalidFormat` for unterminated or nested
/// blocks, blocks without `PEPMASS`, or malformed numbers, and the limit
/// errors when a spectrum or the file grows too large.
pub fn parse_mgf_text(
    text: &str,
    default_mode: IonMode,
) -> Result<Vec<QuerySpectrum>, SpectrumParseError> {
    let mut spectra = Vec::new();
    let mut block: Option<MgfBlock> = None;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        let line_num = i + 1;
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.eq_ignore_ascii_case("BEGIN IONS") {
            if block.is_some() {
                return Err(SpectrumParseError::InvalidFormat(format!(
                    "Nested BEGIN IONS on line {line_num}"
                )));
            }
            block = Some(MgfBlock::default());
            continue;
        }

        if line.eq_ignore_ascii_case("END IONS") {
            let finished = block.take().ok_or_else(|| {
                SpectrumParseError::InvalidFormat(format!(
                    "END IONS without BEGIN IONS on line {line_num}"
                ))
            })?;
            if spectra.len() >= MAX_SPECTRA {
                return Err(SpectrumParseError::TooManySpectra);
            }
            let index = spectra.len() + 1;
            spectra.push(finish_block(finished, index, default_mode, line_num)?);
            continue;
        }

        // Global parameters outside a block are ignored
        let Some(current) = block.as_mut() else {
            continue;
        };

        if let Some((key, value)) = line.split_once('=') {
            match key.trim().to_uppercase().as_str() {
                "TITLE" => current.title = Some(value.trim().to_string()),
                "PEPMASS" => {
                    let mz = value.split_whitespace().next().unwrap_or_default();
                    current.precursor_mz = Some(parse_number(mz, "PEPMASS", line_num)?);
                }
                "RTINSECONDS" => {
                    let seconds = parse_number(value.trim(), "RTINSECONDS", line_num)?;
                    current.rt_minutes = Some(seconds / 60.0);
                }
                "RTINMINUTES" => {
                    current.rt_minutes = Some(parse_number(value.trim(), "RTINMINUTES", line_num)?);
                }
                "CHARGE" => current.ion_mode = current.ion_mode.or(charge_mode(value)),
                "IONMODE" | "ION_MODE" | "POLARITY" => {
                    if let Some(mode) = parse_ion_mode(value) {
                        current.ion_mode = Some(mode);
                    }
                }
                _ => {}
            }
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(mz), Some(intensity)) = (parts.next(), parts.next()) else {
            return Err(SpectrumParseError::InvalidFormat(format!(
                "Line {line_num} is not a peak line"
            )));
        };
        if check_peak_limit(current.peaks.len()).is_some() {
            let title = current.title.clone().unwrap_or_default();
            return Err(SpectrumParseError::TooManyPeaks(title));
        }
        current.peaks.push(SpectrumPeak::new(
            parse_number(mz, "peak m/z", line_num)?,
            parse_number(intensity, "peak intensity", line_num)?,
        ));
    }

    if block.is_some() {
        return Err(SpectrumParseError::InvalidFormat(
            "Unterminated BEGIN IONS block".to_string(),
        ));
    }

    Ok(spectra)
}

fn finish_block(
    block: MgfBlock,
    index: usize,
    default_mode: IonMode,
    line_num: usize,
) -> Result<QuerySpectrum, SpectrumParseError> {
    let precursor_mz = block.precursor_mz.ok_or_else(|| {
        SpectrumParseError::InvalidFormat(format!(
            "Spectrum ending on line {line_num} has no PEPMASS"
        ))
    })?;
    let id = block.title.unwrap_or_else(|| format!("spectrum_{index}"));
    let mut spectrum = QuerySpectrum::new(id, precursor_mz, block.ion_mode.unwrap_or(default_mode))
        .with_peaks(block.peaks);
    spectrum.rt = block.rt_minutes;
    Ok(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MGF: &str = "\
COM=global parameters are ignored
BEGIN IONS
TITLE=scan_1021
PEPMASS=760.585 120000
RTINSECONDS=754.2
CHARGE=1+
184.0733 1200
577.5190 350
END IONS

BEGIN IONS
PEPMASS=716.5236
CHARGE=1-
255.2330\t800
END IONS
";

    #[test]
    fn test_parse_mgf() {
        let spectra = parse_mgf_text(MGF, IonMode::Positive).unwrap();
        assert_eq!(spectra.len(), 2);

        let first = &spectra[0];
        assert_eq!(first.id, "scan_1021");
        assert!((first.precursor_mz - 760.585).abs() < 1e-9);
        assert!((first.rt.unwrap() - 12.57).abs() < 1e-9);
        assert_eq!(first.ion_mode, IonMode::Positive);
        assert_eq!(first.peaks.len(), 2);
        assert!((first.peaks[0].mz - 184.0733).abs() < 1e-9);

        let second = &spectra[1];
        assert_eq!(second.id, "spectrum_2");
        assert_eq!(second.ion_mode, IonMode::Negative);
        assert!(second.rt.is_none());
    }

    #[test]
    fn test_mgf_default_mode() {
        let mgf = "BEGIN IONS\nPEPMASS=716.52\n255.23 10\nEND IONS\n";
        let spectra = parse_mgf_text(mgf, IonMode::Negative).unwrap();
        assert_eq!(spectra[0].ion_mode, IonMode::Negative);
    }

    #[test]
    fn test_mgf_errors() {
        let missing_mass = "BEGIN IONS\n184.07 10\nEND IONS\n";
        assert!(matches!(
            parse_mgf_text(missing_mass, IonMode::Positive),
            Err(SpectrumParseError::InvalidFormat(_))
        ));
        let unterminated = "BEGIN IONS\nPEPMASS=760.5\n";
        assert!(parse_mgf_text(unterminated, IonMode::Positive).is_err());
        let bad_peak = "BEGIN IONS\nPEPMASS=760.5\n184.07 abc\nEND IONS\n";
        let err = parse_mgf_text(bad_peak, IonMode::Positive).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_json_spectra() {
        let json = r#"[
            {"id": "q1", "precursor_mz": 760.585, "rt": 12.5, "ion_mode": "positive",
             "peaks": [{"mz": 184.0733, "intensity": 100.0}]}
        ]"#;
        let spectra = parse_json_spectra(json).unwrap();
        assert_eq!(spectra.len(), 1);
        assert_eq!(spectra[0].peaks[0].resolution, 0.0);
        assert!(parse_json_spectra("[{").is_err());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            SpectrumFormat::detect(Path::new("q.mgf.gz"), ""),
            SpectrumFormat::Mgf
        );
        assert_eq!(
            SpectrumFormat::detect(Path::new("queries"), "  [ ]"),
            SpectrumFormat::Json
        );
    }
}
