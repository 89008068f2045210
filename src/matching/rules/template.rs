use std::cmp::Ordering;
use std::collections::HashMap;

use crate::chemistry::constants::{AMMONIA, PROTON, WATER};
use crate::chemistry::formula::{
    fatty_acid_mass, fatty_alcohol_mass, ketene_mass, sphingoid_base_mass,
};
use crate::core::adduct::Adduct;
use crate::core::chain::{Chain, ChainSet, TotalChain};
use crate::core::molecule::LipidMolecule;
use crate::core::peak::SpectrumPeak;
use crate::core::types::{ChainKind, LipidClass};
use crate::matching::enumerate::{enumerate, PositionConstraint};
use crate::matching::fragment::{count_and_average_with_basis, find_peak};
use crate::matching::reference;
use crate::matching::rules::{ClassRule, Rejection, RuleContext, RuleOutcome};
use crate::matching::scoring::{CategoryEvidence, CharacterizationResult, Evidence};

/// Where a diagnostic ion is expected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticTarget {
    /// Fixed product ion m/z
    Product(f64),
    /// Precursor m/z minus a neutral mass
    NeutralLoss(f64),
}

impl DiagnosticTarget {
    #[must_use]
    pub fn mz(self, precursor_mz: f64) -> f64 {
        match self {
            Self::Product(mz) => mz,
            Self::NeutralLoss(mass) => precursor_mz - mass,
        }
    }
}

/// A diagnostic ion with its minimum abundance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    pub target: DiagnosticTarget,
    pub min_abundance: f64,
}

impl Gate {
    #[must_use]
    pub fn product(mz: f64, min_abundance: f64) -> Self {
        Self {
            target: DiagnosticTarget::Product(mz),
            min_abundance,
        }
    }

    #[must_use]
    pub fn neutral_loss(mass: f64, min_abundance: f64) -> Self {
        Self {
            target: DiagnosticTarget::NeutralLoss(mass),
            min_abundance,
        }
    }
}

/// An ion whose presence points to a competing class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exclusion {
    pub class: LipidClass,
    pub gate: Gate,
}

impl Exclusion {
    #[must_use]
    pub fn new(class: LipidClass, gate: Gate) -> Self {
        Self { class, gate }
    }
}

/// Fragment produced by a single chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFragment {
    /// Precursor minus the acyl chain as a ketene
    KeteneLoss,
    /// Precursor minus the acyl chain as a free fatty acid
    FattyAcidLoss,
    /// Precursor minus fatty acid and ammonia, from `[M+NH4]+`
    FattyAcidAmmoniaLoss,
    /// Fatty acid anion
    Carboxylate,
    /// Sphingoid base after losing two waters
    SphingoidBase,
    /// Precursor minus an ether-linked chain as a fatty alcohol
    AlcoholLoss,
}

impl ChainFragment {
    /// Expected m/z for `chain`, or `None` when the fragment does not apply to
    /// that kind of chain
    #[must_use]
    pub fn expected_mz(self, precursor_mz: f64, chain: &Chain) -> Option<f64> {
        let (carbon, double_bonds) = (chain.carbon, chain.double_bonds);
        match (self, chain.kind) {
            (Self::KeteneLoss, ChainKind::Acyl) => ketene_mass(carbon, double_bonds)
                .ok()
                .map(|mass| precursor_mz - mass),
            (Self::FattyAcidLoss, ChainKind::Acyl) => fatty_acid_mass(carbon, double_bonds)
                .ok()
                .map(|mass| precursor_mz - mass),
            (Self::FattyAcidAmmoniaLoss, ChainKind::Acyl) => fatty_acid_mass(carbon, double_bonds)
                .ok()
                .map(|mass| precursor_mz - mass - AMMONIA),
            (Self::Carboxylate, ChainKind::Acyl) => fatty_acid_mass(carbon, double_bonds)
                .ok()
                .map(|mass| mass - PROTON),
            (Self::SphingoidBase, ChainKind::Sphingoid) => {
                sphingoid_base_mass(carbon, double_bonds, chain.oxidized)
                    .ok()
                    .map(|mass| mass - 2.0 * WATER + PROTON)
            }
            (Self::AlcoholLoss, ChainKind::Alkyl) => fatty_alcohol_mass(carbon, double_bonds)
                .ok()
                .map(|mass| precursor_mz - mass),
            _ => None,
        }
    }
}

/// Rule parameters for one adduct of a class
#[derive(Debug, Clone, PartialEq)]
pub struct AdductBranch {
    pub adduct: Adduct,
    /// Every gate must be present
    pub gates: Vec<Gate>,
    /// Supporting class evidence, not required
    pub class_ions: Vec<Gate>,
    /// Any exclusion present rejects the entry
    pub exclusions: Vec<Exclusion>,
    pub chain_fragments: Vec<ChainFragment>,
    /// Chain fragments a split needs before it is reported
    pub min_found: usize,
    /// Reject instead of falling back to the sum composition
    pub require_chains: bool,
}

impl AdductBranch {
    #[must_use]
    pub fn new(adduct: Adduct) -> Self {
        Self {
            adduct,
            gates: Vec::new(),
            class_ions: Vec::new(),
            exclusions: Vec::new(),
            chain_fragments: Vec::new(),
            min_found: 1,
            require_chains: false,
        }
    }

    #[must_use]
    pub fn gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    #[must_use]
    pub fn class_ion(mut self, gate: Gate) -> Self {
        self.class_ions.push(gate);
        self
    }

    #[must_use]
    pub fn exclude(mut self, class: LipidClass, gate: Gate) -> Self {
        self.exclusions.push(Exclusion::new(class, gate));
        self
    }

    #[must_use]
    pub fn chain_fragments(mut self, fragments: &[ChainFragment]) -> Self {
        self.chain_fragments.extend_from_slice(fragments);
        self
    }

    #[must_use]
    pub fn min_found(mut self, min_found: usize) -> Self {
        self.min_found = min_found;
        self
    }

    #[must_use]
    pub fn require_chains(mut self) -> Self {
        self.require_chains = true;
        self
    }

    /// Check gates, exclusions and class ions, recording class evidence
    fn check_class(&self, ctx: &RuleContext<'_>, evidence: &mut Evidence) -> Result<(), Rejection> {
        let precursor = ctx.reference.mz;
        let tolerance = ctx.config.ms2_tolerance;
        let basis = ctx.config.intensity_basis;
        let lookup = |gate: &Gate| {
            let mz = gate.target.mz(precursor);
            let found = find_peak(ctx.spectrum, tolerance, mz, gate.min_abundance, basis)
                .map(|peak| peak.abundance(basis));
            (mz, found)
        };

        for gate in &self.gates {
            match lookup(gate) {
                (_, Some(abundance)) => evidence.class.record(Some(abundance)),
                (mz, None) => return Err(Rejection::MissingDiagnosticIon { mz }),
            }
        }

        for exclusion in &self.exclusions {
            if let (mz, Some(_)) = lookup(&exclusion.gate) {
                return Err(Rejection::CompetingClassIon {
                    class: exclusion.class,
                    mz,
                });
            }
        }

        for gate in &self.class_ions {
            evidence.class.record(lookup(gate).1);
        }
        Ok(())
    }
}

/// Shared rule skeleton, parameterized per class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTemplate {
    pub class: LipidClass,
    /// One constraint per chain position, sn1 first
    pub layout: Vec<PositionConstraint>,
    pub branches: Vec<AdductBranch>,
}

impl ClassTemplate {
    #[must_use]
    pub fn new(class: LipidClass, layout: Vec<PositionConstraint>) -> Self {
        Self {
            class,
            layout,
            branches: Vec::new(),
        }
    }

    #[must_use]
    pub fn branch(mut self, branch: AdductBranch) -> Self {
        self.branches.push(branch);
        self
    }

    fn find_branch(&self, adduct: Adduct) -> Option<&AdductBranch> {
        self.branches.iter().find(|b| b.adduct == adduct)
    }

    fn required_fragments(&self, branch: &AdductBranch) -> usize {
        if self.layout.len() > 1 {
            branch.min_found.max(1)
        } else {
            branch.min_found
        }
    }

    /// Chain evidence and mean matched abundance for one split
    fn chain_evidence(
        ctx: &RuleContext<'_>,
        branch: &AdductBranch,
        chains: &[Chain],
    ) -> (CategoryEvidence, f64) {
        let queries: Vec<SpectrumPeak> = chains
            .iter()
            .flat_map(|chain| {
                branch
                    .chain_fragments
                    .iter()
                    .filter_map(|fragment| fragment.expected_mz(ctx.reference.mz, chain))
            })
            .map(|mz| SpectrumPeak::new(mz, ctx.config.chain_fragment_abundance))
            .collect();

        let (found, average) = count_and_average_with_basis(
            ctx.spectrum,
            &queries,
            ctx.config.ms2_tolerance,
            ctx.config.intensity_basis,
        );

        #[allow(clippy::cast_precision_loss)] // fragment counts are small
        let evidence = CategoryEvidence {
            expected: queries.len(),
            detected: found,
            matched_abundance: average * found as f64,
        };
        (evidence, average)
    }

    fn candidate(
        ctx: &RuleContext<'_>,
        evidence: &Evidence,
        chains: ChainSet,
        fragment_abundance: f64,
    ) -> LipidMolecule {
        let result = CharacterizationResult::score(evidence, ctx.config.score_mode);
        LipidMolecule::derived(ctx.reference, chains, result)
            .with_fragment_abundance(fragment_abundance)
    }

    fn fallback(ctx: &RuleContext<'_>, branch: &AdductBranch, evidence: &Evidence) -> RuleOutcome {
        if branch.require_chains {
            return RuleOutcome::NoMatch(Rejection::InsufficientChainIons);
        }
        let summed = ctx.reference.chains.summed();
        RuleOutcome::Matched(vec![Self::candidate(ctx, evidence, summed, 0.0)])
    }

    /// Entry whose chains are already separated: score that one split
    fn evaluate_known(
        &self,
        ctx: &RuleContext<'_>,
        branch: &AdductBranch,
        mut evidence: Evidence,
        chains: &[Chain],
    ) -> RuleOutcome {
        let (chain, average) = Self::chain_evidence(ctx, branch, chains);
        if chain.detected < self.required_fragments(branch) {
            return Self::fallback(ctx, branch, &evidence);
        }
        evidence.chain = chain;
        let resolved = ctx
            .reference
            .chains
            .unordered()
            .without_double_bond_positions();
        RuleOutcome::Matched(vec![Self::candidate(ctx, &evidence, resolved, average)])
    }

    /// Entry with summed chains: search every split
    fn evaluate_splits(
        &self,
        ctx: &RuleContext<'_>,
        branch: &AdductBranch,
        evidence: &Evidence,
        total: TotalChain,
    ) -> RuleOutcome {
        let required = self.required_fragments(branch);
        let mut candidates: Vec<LipidMolecule> = Vec::new();
        let mut seen: HashMap<Vec<(ChainKind, u32, u32, u32)>, usize> = HashMap::new();

        for split in enumerate(total, &self.layout) {
            let (chain, average) = Self::chain_evidence(ctx, branch, &split);
            if chain.detected < required {
                continue;
            }
            let mut split_evidence = evidence.clone();
            split_evidence.chain = chain;
            let molecule = Self::candidate(
                ctx,
                &split_evidence,
                ChainSet::separated(split, false),
                average,
            );

            let key = molecule.chains.species_key();
            match seen.get(&key) {
                Some(&index) => {
                    if compare_candidates(&molecule, &candidates[index]) == Ordering::Less {
                        candidates[index] = molecule;
                    }
                }
                None => {
                    seen.insert(key, candidates.len());
                    candidates.push(molecule);
                }
            }
        }

        if candidates.is_empty() {
            return Self::fallback(ctx, branch, evidence);
        }
        candidates.sort_by(compare_candidates);
        RuleOutcome::Matched(candidates)
    }
}

/// Best first: score, then matched ion count, then chain fragment abundance
pub(crate) fn compare_candidates(a: &LipidMolecule, b: &LipidMolecule) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.matched_ion_count.cmp(&a.matched_ion_count))
        .then_with(|| {
            b.fragment_abundance
                .partial_cmp(&a.fragment_abundance)
                .unwrap_or(Ordering::Equal)
        })
}

impl ClassRule for ClassTemplate {
    fn class(&self) -> LipidClass {
        self.class
    }

    fn adducts(&self) -> Vec<Adduct> {
        self.branches.iter().map(|b| b.adduct).collect()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        if ctx.spectrum.is_empty() {
            return RuleOutcome::NoMatch(Rejection::EmptySpectrum);
        }
        let adduct = ctx.reference.adduct;
        let Some(branch) = self.find_branch(adduct) else {
            return RuleOutcome::NoMatch(Rejection::UnsupportedAdduct { adduct });
        };

        let mut evidence = Evidence::default();
        if let Err(rejection) = branch.check_class(ctx, &mut evidence) {
            return RuleOutcome::NoMatch(rejection);
        }

        if !ctx.reference.reference_spectrum.is_empty() {
            return reference::characterize(ctx, evidence);
        }

        match &ctx.reference.chains {
            ChainSet::Separated { chains, .. } => {
                self.evaluate_known(ctx, branch, evidence, chains)
            }
            ChainSet::Total(total) => self.evaluate_splits(ctx, branch, &evidence, *total),
        }
    }
}
