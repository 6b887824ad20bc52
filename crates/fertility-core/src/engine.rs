//! End-to-end fertility computation pipeline.
//!
//! Profile → Validator → Calculators → Aggregator → Interactions →
//! Synthesizer → Classifier → Result
//!
//! Every stage is a pure function. The engine holds only its configuration
//! and may be shared freely across threads.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::aggregator::aggregate;
use crate::benchmarks::{check_plausibility, references_for};
use crate::classifier::{classify, recommend};
use crate::config::{ConfigResult, EngineConfig};
use crate::interactions::generate_report;
use crate::models::{ClinicalProfile, ComprehensiveFertilityResult, FactorAxis, MedicalFactors};
use crate::synthesis::synthesize;
use crate::validation::{validate_available_data, validate_with, CalculationResult};

/// Engine version recorded in results and fingerprints.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The fertility probability engine.
#[derive(Debug, Clone, Default)]
pub struct FertilityEngine {
    config: EngineConfig,
}

impl FertilityEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline for one profile.
    pub fn evaluate(&self, profile: &ClinicalProfile) -> CalculationResult<ComprehensiveFertilityResult> {
        let span = tracing::info_span!("evaluate", age = ?profile.age);
        let _guard = span.enter();

        let validated = validate_with(profile, &self.config.consistency)?;
        let availability = validate_available_data(profile);
        let factors = aggregate(&validated);
        let interaction_report = generate_report(&validated);
        let synthesis = synthesize(
            &factors,
            &interaction_report.interactions,
            availability.confidence,
            &self.config,
        )?;
        let classification = classify(synthesis.monthly, &validated, &interaction_report);
        let recommendations = recommend(&validated, &factors, self.config.max_recommendations);
        let benchmarks = references_for(&validated);

        let age = validated.age();
        let mut warnings = validated.into_warnings();
        if let Some(deviation) = check_plausibility(age, synthesis.monthly, self.config.benchmark_tolerance) {
            warnings.push(deviation);
        }

        tracing::info!(
            monthly = synthesis.monthly,
            category = ?classification.category,
            interactions = interaction_report.interactions.len(),
            warnings = warnings.len(),
            "Evaluation complete"
        );

        Ok(ComprehensiveFertilityResult {
            monthly_probability: synthesis.monthly,
            cycles_per_year: self.config.cycles_per_year,
            category: classification.category,
            treatment_complexity: classification.complexity,
            urgency: classification.urgency,
            treatment_path: classification.path,
            key_factors: key_factors(&factors),
            recommendations,
            confidence: synthesis.confidence,
            availability,
            interaction_report,
            warnings,
            benchmarks,
            profile_fingerprint: profile_fingerprint(profile),
            engine_version: ENGINE_VERSION.to_string(),
        })
    }

    /// Evaluate several independent profiles.
    pub fn evaluate_all(
        &self,
        profiles: &[ClinicalProfile],
    ) -> Vec<CalculationResult<ComprehensiveFertilityResult>> {
        profiles.iter().map(|p| self.evaluate(p)).collect()
    }
}

/// Age fecundability plus every non-neutral multiplier.
fn key_factors(factors: &MedicalFactors) -> BTreeMap<FactorAxis, f64> {
    std::iter::once((FactorAxis::Age, factors.age))
        .chain(factors.non_neutral())
        .collect()
}

/// SHA-256 over the canonical profile JSON and the engine version.
pub fn profile_fingerprint(profile: &ClinicalProfile) -> String {
    let mut hasher = Sha256::new();
    match profile.to_canonical_json() {
        Ok(json) => hasher.update(json.as_bytes()),
        Err(e) => {
            tracing::warn!(error = %e, "Profile not serializable, fingerprinting debug form");
            hasher.update(format!("{:?}", profile).as_bytes());
        }
    }
    hasher.update(b"\n");
    hasher.update(ENGINE_VERSION.as_bytes());
    hex::encode(hasher.finalize())
}
