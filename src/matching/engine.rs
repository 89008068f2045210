use std::borrow::Cow;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::index::{CandidateFinder, WindowSearch};
use crate::catalog::store::LipidLibrary;
use crate::core::adduct::Adduct;
use crate::core::molecule::{LipidMolecule, ReferenceMolecule};
use crate::core::peak::QuerySpectrum;
use crate::core::types::{IntensityBasis, LipidClass};
use crate::matching::rules::{RuleContext, RuleOutcome, RuleRegistry};
use crate::matching::scoring::ScoreMode;
use crate::utils::validation::{validate_threshold, validate_tolerance, ValidationError};

/// Default precursor window half-width in Da
pub const DEFAULT_MS1_TOLERANCE: f64 = 0.01;

/// Default fragment window half-width in Da
pub const DEFAULT_MS2_TOLERANCE: f64 = 0.05;

/// Default minimum abundance for chain fragment queries
pub const DEFAULT_CHAIN_FRAGMENT_ABUNDANCE: f64 = 0.1;

/// Base peak intensity after normalization
pub const NORMALIZED_BASE_PEAK: f64 = 100.0;

/// Configuration for the annotation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub ms1_tolerance: f64,
    pub ms2_tolerance: f64,
    pub chain_fragment_abundance: f64,
    /// Minimum observed abundance when matching reference-spectrum peaks
    pub reference_fragment_abundance: f64,
    pub intensity_basis: IntensityBasis,
    pub score_mode: ScoreMode,
    pub window_search: WindowSearch,
    /// Scale each query so its base peak is [`NORMALIZED_BASE_PEAK`]
    pub normalize_queries: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            ms1_tolerance: DEFAULT_MS1_TOLERANCE,
            ms2_tolerance: DEFAULT_MS2_TOLERANCE,
            chain_fragment_abundance: DEFAULT_CHAIN_FRAGMENT_ABUNDANCE,
            reference_fragment_abundance: 0.0,
            intensity_basis: IntensityBasis::default(),
            score_mode: ScoreMode::default(),
            window_search: WindowSearch::default(),
            normalize_queries: true,
        }
    }
}

impl AnnotationConfig {
    /// Check tolerances and thresholds
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_tolerance("ms1_tolerance", self.ms1_tolerance)?;
        validate_tolerance("ms2_tolerance", self.ms2_tolerance)?;
        validate_threshold("chain_fragment_abundance", self.chain_fragment_abundance)?;
        validate_threshold(
            "reference_fragment_abundance",
            self.reference_fragment_abundance,
        )?;
        Ok(())
    }
}

/// What happened to one in-window library entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum EvaluationStatus {
    Evaluated(RuleOutcome),
    /// No rule registered for the entry's class
    NoRule,
    /// Entry adduct polarity differs from the query's
    IonModeMismatch,
}

/// Trace record for one library entry inside the precursor window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub reference_name: String,
    pub reference_mz: f64,
    pub class: LipidClass,
    pub adduct: Adduct,
    #[serde(flatten)]
    pub status: EvaluationStatus,
}

impl Evaluation {
    fn new(reference: &ReferenceMolecule, status: EvaluationStatus) -> Self {
        Self {
            reference_name: reference.name.clone(),
            reference_mz: reference.mz,
            class: reference.class,
            adduct: reference.adduct,
            status,
        }
    }

    /// Best candidate of a matched rule
    #[must_use]
    pub fn best(&self) -> Option<&LipidMolecule> {
        match &self.status {
            EvaluationStatus::Evaluated(outcome) => outcome.best(),
            _ => None,
        }
    }
}

/// Annotation of one query spectrum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub query_id: String,
    pub precursor_mz: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt: Option<f64>,
    pub result: Option<LipidMolecule>,
}

/// Annotates query spectra against a reference library
pub struct AnnotationEngine<'a> {
    library: &'a LipidLibrary,
    registry: RuleRegistry,
    config: AnnotationConfig,
}

impl<'a> AnnotationEngine<'a> {
    /// Create an engine with the built-in rules and default configuration
    #[must_use]
    pub fn new(library: &'a LipidLibrary) -> Self {
        Self::with_config(library, AnnotationConfig::default())
    }

    /// Create an engine with the built-in rules and custom configuration
    #[must_use]
    pub fn with_config(library: &'a LipidLibrary, config: AnnotationConfig) -> Self {
        Self::with_registry(library, RuleRegistry::builtin(), config)
    }

    #[must_use]
    pub fn with_registry(
        library: &'a LipidLibrary,
        registry: RuleRegistry,
        config: AnnotationConfig,
    ) -> Self {
        Self {
            library,
            registry,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    fn prepare<'q>(&self, query: &'q QuerySpectrum) -> Cow<'q, QuerySpectrum> {
        if self.config.normalize_queries {
            Cow::Owned(query.normalized(NORMALIZED_BASE_PEAK))
        } else {
            Cow::Borrowed(query)
        }
    }

    fn evaluate_entry(&self, query: &QuerySpectrum, reference: &ReferenceMolecule) -> Evaluation {
        if reference.ion_mode() != query.ion_mode {
            return Evaluation::new(reference, EvaluationStatus::IonModeMismatch);
        }
        let Some(rule) = self.registry.get(reference.class) else {
            debug!("No rule registered for {} ({})", reference.name, reference.class);
            return Evaluation::new(reference, EvaluationStatus::NoRule);
        };

        let outcome = rule.evaluate(&RuleContext {
            spectrum: &query.peaks,
            reference,
            config: &self.config,
        });
        match &outcome {
            RuleOutcome::Matched(candidates) => debug!(
                "{} {} at {:.4}: {} candidate(s), best {}",
                reference.name,
                reference.adduct,
                reference.mz,
                candidates.len(),
                candidates
                    .first()
                    .map(|c| format!("{} ({:.3})", c.name, c.score))
                    .unwrap_or_default()
            ),
            RuleOutcome::NoMatch(rejection) => debug!(
                "{} {} at {:.4}: rejected, {}",
                reference.name, reference.adduct, reference.mz, rejection
            ),
        }
        Evaluation::new(reference, EvaluationStatus::Evaluated(outcome))
    }

    /// Evaluate every library entry in the query's precursor window, in
    /// ascending m/z order
    #[must_use]
    pub fn characterize_with_trace(&self, query: &QuerySpectrum) -> Vec<Evaluation> {
        let query = self.prepare(query);
        let finder = CandidateFinder::new(self.library, self.config.window_search);
        finder
            .find_candidates(query.precursor_mz, self.config.ms1_tolerance)
            .into_iter()
            .filter_map(|index| self.library.get(index))
            .map(|reference| self.evaluate_entry(&query, reference))
            .collect()
    }

    /// Best-scoring annotation for a query, or `None` when no rule matched.
    /// Ties keep the entry seen first.
    #[must_use]
    pub fn characterize(&self, query: &QuerySpectrum) -> Option<LipidMolecule> {
        let mut best: Option<LipidMolecule> = None;
        for evaluation in self.characterize_with_trace(query) {
            let EvaluationStatus::Evaluated(outcome) = evaluation.status else {
                continue;
            };
            let Some(candidate) = outcome.into_candidates().into_iter().next() else {
                continue;
            };
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best
    }

    #[must_use]
    pub fn annotate(&self, query: &QuerySpectrum) -> Annotation {
        Annotation {
            query_id: query.id.clone(),
            precursor_mz: query.precursor_mz,
            rt: query.rt,
            result: self.characterize(query),
        }
    }

    /// Annotate queries in parallel on the current rayon pool, keeping input order
    #[must_use]
    pub fn annotate_batch(&self, queries: &[QuerySpectrum]) -> Vec<Annotation> {
        queries.par_iter().map(|query| self.annotate(query)).collect()
    }
}
