//! Tolerance-based detection of diagnostic fragments in a peak list.
//!
//! A peak matches a target when `|peak.mz - target| < tolerance` and its
//! abundance is strictly greater than the threshold. When several peaks fall in
//! the same window the first one in spectrum order is used.

use crate::core::peak::SpectrumPeak;
use crate::core::types::IntensityBasis;

/// A fragment expected at `mz` with at least `min_abundance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticIon {
    pub mz: f64,
    pub tolerance: f64,
    pub min_abundance: f64,
}

impl DiagnosticIon {
    #[must_use]
    pub fn new(mz: f64, tolerance: f64, min_abundance: f64) -> Self {
        Self {
            mz,
            tolerance,
            min_abundance,
        }
    }
}

#[inline]
fn within(peak: &SpectrumPeak, target_mz: f64, tolerance: f64) -> bool {
    (peak.mz - target_mz).abs() < tolerance
}

/// First peak matching `target_mz` on the requested abundance channel
#[must_use]
pub fn find_peak(
    spectrum: &[SpectrumPeak],
    tolerance: f64,
    target_mz: f64,
    min_abundance: f64,
    basis: IntensityBasis,
) -> Option<&SpectrumPeak> {
    spectrum
        .iter()
        .find(|p| within(p, target_mz, tolerance) && p.abundance(basis) > min_abundance)
}

/// Is there a peak at `target_mz` with intensity above `min_intensity`?
#[must_use]
pub fn exists(
    spectrum: &[SpectrumPeak],
    tolerance: f64,
    target_mz: f64,
    min_intensity: f64,
) -> bool {
    exists_with_basis(
        spectrum,
        tolerance,
        target_mz,
        min_intensity,
        IntensityBasis::Intensity,
    )
}

/// [`exists`] against either abundance channel
#[must_use]
pub fn exists_with_basis(
    spectrum: &[SpectrumPeak],
    tolerance: f64,
    target_mz: f64,
    min_abundance: f64,
    basis: IntensityBasis,
) -> bool {
    find_peak(spectrum, tolerance, target_mz, min_abundance, basis).is_some()
}

/// True when every ion in the batch is found. An empty batch is vacuously true.
#[must_use]
pub fn exists_batch(spectrum: &[SpectrumPeak], ions: &[DiagnosticIon]) -> bool {
    ions.iter()
        .all(|ion| exists(spectrum, ion.tolerance, ion.mz, ion.min_abundance))
}

/// Count how many query peaks are present and average the matched intensity.
///
/// Each query peak's `intensity` is its own minimum threshold. The average is
/// taken over the found peaks only and is `0.0` when nothing matched.
#[must_use]
pub fn count_and_average(
    spectrum: &[SpectrumPeak],
    queries: &[SpectrumPeak],
    tolerance: f64,
) -> (usize, f64) {
    count_and_average_with_basis(spectrum, queries, tolerance, IntensityBasis::Intensity)
}

/// [`count_and_average`] against either abundance channel
#[must_use]
pub fn count_and_average_with_basis(
    spectrum: &[SpectrumPeak],
    queries: &[SpectrumPeak],
    tolerance: f64,
    basis: IntensityBasis,
) -> (usize, f64) {
    let mut found = 0usize;
    let mut summed = 0.0;

    for query in queries {
        if let Some(peak) = find_peak(spectrum, tolerance, query.mz, query.intensity, basis) {
            found += 1;
            summed += peak.abundance(basis);
        }
    }

    if found == 0 {
        return (0, 0.0);
    }

    #[allow(clippy::cast_precision_loss)] // peak counts are small
    let average = summed / found as f64;
    (found, average)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum() -> Vec<SpectrumPeak> {
        vec![
            SpectrumPeak::new(184.0733, 100.0).with_resolution(5.0),
            SpectrumPeak::new(496.3398, 12.0),
            SpectrumPeak::new(522.3554, 8.0),
        ]
    }

    #[test]
    fn test_exists_within_tolerance() {
        let peaks = spectrum();
        assert!(exists(&peaks, 0.01, 184.07, 1.0));
        assert!(!exists(&peaks, 0.001, 184.07, 1.0));
        assert!(!exists(&peaks, 0.01, 184.07, 100.0));
    }

    #[test]
    fn test_boundary_is_exclusive() {
        for tolerance in [0.005, 0.01, 0.05, 0.5] {
            let target = 300.0;
            let inside = vec![SpectrumPeak::new(target + 0.999 * tolerance, 10.0)];
            let outside = vec![SpectrumPeak::new(target + 1.001 * tolerance, 10.0)];
            assert!(exists(&inside, tolerance, target, 1.0));
            assert!(!exists(&outside, tolerance, target, 1.0));
        }
    }

    #[test]
    fn test_intensity_threshold_is_strict() {
        let peaks = vec![SpectrumPeak::new(300.0, 5.0)];
        assert!(!exists(&peaks, 0.01, 300.0, 5.0));
        assert!(exists(&peaks, 0.01, 300.0, 4.999));
    }

    #[test]
    fn test_resolution_basis() {
        let peaks = spectrum();
        assert!(!exists_with_basis(&peaks, 0.01, 184.0733, 10.0, IntensityBasis::Resolution));
        assert!(exists_with_basis(&peaks, 0.01, 184.0733, 1.0, IntensityBasis::Resolution));
    }

    #[test]
    fn test_exists_batch() {
        let peaks = spectrum();
        assert!(exists_batch(&peaks, &[]));
        assert!(exists_batch(&[], &[]));
        let ions = [
            DiagnosticIon::new(184.0733, 0.01, 1.0),
            DiagnosticIon::new(496.3398, 0.01, 1.0),
        ];
        assert!(exists_batch(&peaks, &ions));
        let missing = [
            DiagnosticIon::new(184.0733, 0.01, 1.0),
            DiagnosticIon::new(700.0, 0.01, 1.0),
        ];
        assert!(!exists_batch(&peaks, &missing));
    }

    #[test]
    fn test_count_and_average() {
        let peaks = spectrum();
        let queries = vec![
            SpectrumPeak::new(496.3398, 0.1),
            SpectrumPeak::new(522.3554, 0.1),
            SpectrumPeak::new(600.0, 0.1),
        ];
        let (found, average) = count_and_average(&peaks, &queries, 0.01);
        assert_eq!(found, 2);
        assert!((average - 10.0).abs() < 1e-9);

        let (found, average) = count_and_average(&peaks, &[], 0.01);
        assert_eq!(found, 0);
        assert!(average.abs() < f64::EPSILON);
    }

    #[test]
    fn test_first_peak_in_window_wins() {
        let peaks = vec![SpectrumPeak::new(300.004, 2.0), SpectrumPeak::new(300.0, 50.0)];
        let peak = find_peak(&peaks, 0.01, 300.0, 1.0, IntensityBasis::Intensity).unwrap();
        assert!((peak.intensity - 2.0).abs() < 1e-9);
    }
}
