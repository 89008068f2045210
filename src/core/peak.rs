use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{IntensityBasis, IonMode};

/// Evidence category a reference peak belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakRole {
    /// Head group or backbone fragment identifying the class
    ClassIon,
    /// Fragment identifying an individual chain
    ChainIon,
    /// Fragment identifying which chain sits at which sn-position
    PositionIon,
    /// Double-bond diagnostic fragment, high confidence
    DoubleBondHigh,
    /// Double-bond diagnostic fragment, low confidence
    DoubleBondLow,
}

/// A single peak, observed or theoretical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPeak {
    pub mz: f64,

    pub intensity: f64,

    /// Secondary abundance channel. On reference peaks this holds the expected
    /// relative abundance used for double-bond correlation scoring.
    #[serde(default)]
    pub resolution: f64,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub roles: BTreeSet<PeakRole>,

    /// The annotation is rejected when this reference peak is not observed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    /// Set while matching a reference spectrum against an observed one
    #[serde(skip)]
    pub matched: bool,
}

impl SpectrumPeak {
    #[must_use]
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self {
            mz,
            intensity,
            resolution: 0.0,
            roles: BTreeSet::new(),
            required: false,
            matched: false,
        }
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: PeakRole) -> Self {
        self.roles.insert(role);
        self
    }

    #[must_use]
    pub fn as_required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn has_role(&self, role: PeakRole) -> bool {
        self.roles.contains(&role)
    }

    /// Abundance on the requested channel
    #[must_use]
    pub fn abundance(&self, basis: IntensityBasis) -> f64 {
        match basis {
            IntensityBasis::Intensity => self.intensity,
            IntensityBasis::Resolution => self.resolution,
        }
    }
}

/// An observed MS/MS scan to annotate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpectrum {
    pub id: String,

    pub precursor_mz: f64,

    /// Retention time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rt: Option<f64>,

    pub ion_mode: IonMode,

    pub peaks: Vec<SpectrumPeak>,
}

impl QuerySpectrum {
    pub fn new(id: impl Into<String>, precursor_mz: f64, ion_mode: IonMode) -> Self {
        Self {
            id: id.into(),
            precursor_mz,
            rt: None,
            ion_mode,
            peaks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rt(mut self, rt: f64) -> Self {
        self.rt = Some(rt);
        self
    }

    #[must_use]
    pub fn with_peaks(mut self, peaks: Vec<SpectrumPeak>) -> Self {
        self.peaks = peaks;
        self
    }

    /// Add a peak from an (m/z, intensity) pair
    #[must_use]
    pub fn with_peak(mut self, mz: f64, intensity: f64) -> Self {
        self.peaks.push(SpectrumPeak::new(mz, intensity));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    #[must_use]
    pub fn base_peak_intensity(&self) -> f64 {
        self.peaks.iter().map(|p| p.intensity).fold(0.0, f64::max)
    }

    /// Copy scaled so that the base peak has intensity `max`.
    /// Spectra without a positive base peak are returned unchanged.
    #[must_use]
    pub fn normalized(&self, max: f64) -> Self {
        let base = self.base_peak_intensity();
        if base <= 0.0 {
            return self.clone();
        }
        let factor = max / base;
        let peaks = self
            .peaks
            .iter()
            .map(|p| SpectrumPeak {
                intensity: p.intensity * factor,
                ..p.clone()
            })
            .collect();
        Self {
            peaks,
            ..self.clone()
        }
    }
}
