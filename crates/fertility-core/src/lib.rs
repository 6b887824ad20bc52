//! Fertility Core Library
//!
//! On-device fertility probability engine: converts a clinical profile into a
//! bounded monthly and annual pregnancy probability, a qualitative category,
//! a treatment path and evidence-cited recommendations.
//!
//! # Architecture
//!
//! ```text
//! ClinicalProfile → Validator → Factor Calculators → Aggregator
//!                                                        │
//!                                              Interaction Engine
//!                                                        │
//!                                    ┌───────────────────▼───────────────────┐
//!                                    │         Probability Synthesizer       │
//!                                    │  age × ∏ factors × ∏ (1 - correction) │
//!                                    │  clamp to [0.005, 0.25]               │
//!                                    └───────────────────┬───────────────────┘
//!                                                        │
//!                                                   Classifier
//!                                                        │
//!                            ┌───────────────────────────┼───────────────────────────┐
//!                            │                           │                           │
//!                            ▼                           ▼                           ▼
//!                       Results UI                  PDF Report               Treatment Simulator
//! ```
//!
//! # Core Principle
//!
//! **Absent data never fails a computation.** Only age is mandatory; every
//! other missing input is neutral and lowers the confidence score.
//!
//! # Modules
//!
//! - [`models`]: Domain types (ClinicalProfile, MedicalFactors, results)
//! - [`validation`]: Range checks, consistency warnings, availability scoring
//! - [`factors`]: Band-table factor calculators
//! - [`aggregator`]: Per-axis factor assembly
//! - [`interactions`]: Nonlinear interaction rules
//! - [`synthesis`]: Bounded probability synthesis
//! - [`classifier`]: Category, treatment tier and recommendations
//! - [`benchmarks`]: Subgroup reference tables
//! - [`engine`]: End-to-end pipeline
//! - [`simulator`]: What-if treatment scenarios
//! - [`export`]: Report export

pub mod aggregator;
pub mod benchmarks;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod export;
pub mod factors;
pub mod interactions;
pub mod models;
pub mod simulator;
pub mod synthesis;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use engine::FertilityEngine;
pub use export::ReportExport;
pub use models::{
    ClinicalProfile, ComprehensiveFertilityResult, FactorAxis, FertilityCategory,
    InteractionRecord, MedicalFactors, SemenAnalysis, TreatmentPath,
};
pub use simulator::{ProfileAdjustment, SimulationOutcome, TreatmentSimulator};
pub use validation::{MedicalCalculationError, MedicalValidationError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::str::FromStr;
use std::sync::Arc;

use models::{EndometriosisStage, ParseLabelError};
use validation::DataAvailability;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FertilityError {
    #[error("{field} value {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Required field missing: {0}")]
    InsufficientData(String),

    #[error("Calculation error: {0}")]
    CalculationOverflow(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<MedicalCalculationError> for FertilityError {
    fn from(e: MedicalCalculationError) -> Self {
        match e {
            MedicalCalculationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => FertilityError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            },
            MedicalCalculationError::InsufficientData { field } => {
                FertilityError::InsufficientData(field.to_string())
            }
            overflow @ MedicalCalculationError::CalculationOverflow { .. } => {
                FertilityError::CalculationOverflow(overflow.to_string())
            }
        }
    }
}

impl From<ConfigError> for FertilityError {
    fn from(e: ConfigError) -> Self {
        FertilityError::ConfigurationError(e.to_string())
    }
}

impl From<ParseLabelError> for FertilityError {
    fn from(e: ParseLabelError) -> Self {
        FertilityError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for FertilityError {
    fn from(e: serde_json::Error) -> Self {
        FertilityError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an engine from a JSON configuration; absent keys keep defaults.
#[uniffi::export]
pub fn create_engine(config_json: String) -> Result<Arc<FertilityCore>, FertilityError> {
    let config = EngineConfig::from_json(&config_json)?;
    Ok(Arc::new(FertilityCore {
        engine: FertilityEngine::new(config)?,
    }))
}

/// Create an engine with the default configuration.
#[uniffi::export]
pub fn create_default_engine() -> Arc<FertilityCore> {
    Arc::new(FertilityCore {
        engine: FertilityEngine::default(),
    })
}

// =========================================================================
// Main API Object
// =========================================================================

/// Engine handle for FFI. Immutable, so safe to call from any thread.
#[derive(uniffi::Object)]
pub struct FertilityCore {
    engine: FertilityEngine,
}

#[uniffi::export]
impl FertilityCore {
    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Evaluate a profile.
    pub fn evaluate(&self, profile: FfiClinicalProfile) -> Result<FfiFertilityResult, FertilityError> {
        let profile = ClinicalProfile::try_from(profile)?;
        Ok(self.engine.evaluate(&profile)?.into())
    }

    /// Evaluate a profile given as JSON and return the full result as JSON.
    pub fn evaluate_json(&self, profile_json: String) -> Result<String, FertilityError> {
        let profile: ClinicalProfile = serde_json::from_str(&profile_json)?;
        Ok(self.engine.evaluate(&profile)?.to_json()?)
    }

    /// Which inputs are present and the resulting confidence.
    pub fn analyze_availability(
        &self,
        profile: FfiClinicalProfile,
    ) -> Result<FfiDataAvailability, FertilityError> {
        let profile = ClinicalProfile::try_from(profile)?;
        Ok(validation::validate_available_data(&profile).into())
    }

    // =========================================================================
    // Treatment Simulation
    // =========================================================================

    /// Adjustments that apply to a profile.
    pub fn suggested_adjustments(
        &self,
        profile: FfiClinicalProfile,
    ) -> Result<Vec<FfiAdjustment>, FertilityError> {
        let profile = ClinicalProfile::try_from(profile)?;
        Ok(simulator::suggested_scenarios(&profile)
            .iter()
            .map(FfiAdjustment::from)
            .collect())
    }

    /// Apply adjustments together and compare with the baseline.
    pub fn simulate(
        &self,
        profile: FfiClinicalProfile,
        adjustments: Vec<FfiAdjustment>,
    ) -> Result<FfiSimulationOutcome, FertilityError> {
        let profile = ClinicalProfile::try_from(profile)?;
        let adjustments = adjustments
            .into_iter()
            .map(|a| ProfileAdjustment::from_parts(&a.kind, a.value))
            .collect::<Result<Vec<_>, _>>()?;
        let outcome = TreatmentSimulator::new(&self.engine).simulate(&profile, &adjustments)?;
        Ok(outcome.into())
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Evaluate and package the result as a report document.
    pub fn export_report_json(&self, profile: FfiClinicalProfile) -> Result<String, FertilityError> {
        let profile = ClinicalProfile::try_from(profile)?;
        let result = self.engine.evaluate(&profile)?;
        Ok(ReportExport::from_result(result).to_json()?)
    }

    /// Engine version recorded in results.
    pub fn engine_version(&self) -> String {
        engine::ENGINE_VERSION.to_string()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe semen analysis.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiSemenAnalysis {
    pub concentration: Option<f64>,
    pub motility: Option<f64>,
    pub morphology: Option<f64>,
    pub dna_fragmentation: Option<f64>,
    pub varicocele: Option<bool>,
    pub seminal_culture_positive: Option<bool>,
}

impl From<FfiSemenAnalysis> for SemenAnalysis {
    fn from(semen: FfiSemenAnalysis) -> Self {
        SemenAnalysis {
            concentration: semen.concentration,
            motility: semen.motility,
            morphology: semen.morphology,
            dna_fragmentation: semen.dna_fragmentation,
            varicocele: semen.varicocele,
            seminal_culture_positive: semen.seminal_culture_positive,
        }
    }
}

/// FFI-safe clinical profile. Categorical fields are labels parsed on entry.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiClinicalProfile {
    pub age: Option<f64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub amh: Option<f64>,
    pub tsh: Option<f64>,
    pub prolactin: Option<f64>,
    pub homa_ir: Option<f64>,
    pub cycle_length_days: Option<f64>,
    pub infertility_duration_years: Option<f64>,
    pub pelvic_surgery_count: Option<u32>,
    pub parity: Option<u32>,
    pub has_pcos: Option<bool>,
    pub pcos_phenotype: Option<String>,
    /// rASRM stage 0-4
    pub endometriosis_stage: Option<u8>,
    pub myoma_type: Option<String>,
    pub myoma_size_cm: Option<f64>,
    pub adenomyosis: Option<String>,
    pub polyp: Option<String>,
    pub tubal_patency: Option<String>,
    pub bilateral_tubal_occlusion: Option<bool>,
    pub semen: FfiSemenAnalysis,
}

fn parse_label<T>(label: Option<String>) -> Result<Option<T>, ParseLabelError>
where
    T: FromStr<Err = ParseLabelError>,
{
    label.map(|s| s.parse()).transpose()
}

impl TryFrom<FfiClinicalProfile> for ClinicalProfile {
    type Error = FertilityError;

    fn try_from(p: FfiClinicalProfile) -> Result<Self, Self::Error> {
        let endometriosis_stage = p
            .endometriosis_stage
            .map(|stage| {
                EndometriosisStage::from_stage(stage).ok_or_else(|| {
                    FertilityError::InvalidInput(format!("endometriosis stage {} is not in 0-4", stage))
                })
            })
            .transpose()?;

        Ok(ClinicalProfile {
            age: p.age,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            bmi: p.bmi,
            amh: p.amh,
            tsh: p.tsh,
            prolactin: p.prolactin,
            homa_ir: p.homa_ir,
            cycle_length_days: p.cycle_length_days,
            infertility_duration_years: p.infertility_duration_years,
            pelvic_surgery_count: p.pelvic_surgery_count,
            parity: p.parity,
            has_pcos: p.has_pcos,
            pcos_phenotype: parse_label(p.pcos_phenotype)?,
            endometriosis_stage,
            myoma_type: parse_label(p.myoma_type)?,
            myoma_size_cm: p.myoma_size_cm,
            adenomyosis: parse_label(p.adenomyosis)?,
            polyp: parse_label(p.polyp)?,
            tubal_patency: parse_label(p.tubal_patency)?,
            bilateral_tubal_occlusion: p.bilateral_tubal_occlusion,
            semen: p.semen.into(),
        })
    }
}

/// FFI-safe key factor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiKeyFactor {
    pub axis: String,
    pub label: String,
    pub value: f64,
}

/// FFI-safe recommendation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub category: String,
    pub evidence: String,
    pub citations: Vec<String>,
}

impl From<models::Recommendation> for FfiRecommendation {
    fn from(rec: models::Recommendation) -> Self {
        Self {
            id: rec.id,
            title: rec.title,
            description: rec.description,
            priority: format!("{:?}", rec.priority),
            category: format!("{:?}", rec.category),
            evidence: format!("{:?}", rec.evidence),
            citations: rec.citations,
        }
    }
}

/// FFI-safe interaction.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteraction {
    pub id: String,
    pub name: String,
    pub trigger: String,
    pub correction: f64,
    pub priority: String,
    pub forces_treatment_change: bool,
}

impl From<InteractionRecord> for FfiInteraction {
    fn from(record: InteractionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            trigger: record.trigger,
            correction: record.correction,
            priority: format!("{:?}", record.priority),
            forces_treatment_change: record.forces_treatment_change,
        }
    }
}

/// FFI-safe evaluation result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFertilityResult {
    pub monthly_probability: f64,
    pub annual_probability: f64,
    pub category: String,
    pub category_label: String,
    pub treatment_complexity: String,
    pub urgency: String,
    pub treatment_path: String,
    pub treatment_path_label: String,
    pub key_factors: Vec<FfiKeyFactor>,
    pub recommendations: Vec<FfiRecommendation>,
    pub confidence: f64,
    pub interactions: Vec<FfiInteraction>,
    pub interaction_multiplier: f64,
    pub forces_treatment_change: bool,
    pub warnings: Vec<String>,
    pub profile_fingerprint: String,
    pub engine_version: String,
}

impl From<ComprehensiveFertilityResult> for FfiFertilityResult {
    fn from(result: ComprehensiveFertilityResult) -> Self {
        let annual_probability = result.annual_probability();
        let forces_treatment_change = result.forces_treatment_change();
        Self {
            monthly_probability: result.monthly_probability,
            annual_probability,
            category: format!("{:?}", result.category),
            category_label: result.category.label().to_string(),
            treatment_complexity: format!("{:?}", result.treatment_complexity),
            urgency: format!("{:?}", result.urgency),
            treatment_path: format!("{:?}", result.treatment_path),
            treatment_path_label: result.treatment_path.label().to_string(),
            key_factors: result
                .key_factors
                .into_iter()
                .map(|(axis, value)| FfiKeyFactor {
                    axis: axis.key().to_string(),
                    label: axis.label().to_string(),
                    value,
                })
                .collect(),
            recommendations: result.recommendations.into_iter().map(|r| r.into()).collect(),
            confidence: result.confidence,
            interaction_multiplier: result.interaction_report.combined_multiplier,
            interactions: result
                .interaction_report
                .interactions
                .into_iter()
                .map(|i| i.into())
                .collect(),
            forces_treatment_change,
            warnings: result.warnings.iter().map(|w| w.to_string()).collect(),
            profile_fingerprint: result.profile_fingerprint,
            engine_version: result.engine_version,
        }
    }
}

/// FFI-safe availability analysis.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDataAvailability {
    pub available: Vec<String>,
    pub missing: Vec<String>,
    pub confidence: f64,
}

impl From<DataAvailability> for FfiDataAvailability {
    fn from(availability: DataAvailability) -> Self {
        Self {
            available: availability.available.iter().map(|f| f.to_string()).collect(),
            missing: availability.missing.iter().map(|f| f.to_string()).collect(),
            confidence: availability.confidence,
        }
    }
}

/// FFI-safe profile adjustment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAdjustment {
    /// e.g. "set_bmi", "resect_myoma"
    pub kind: String,
    /// Target value; defaults apply when absent
    pub value: Option<f64>,
}

impl From<&ProfileAdjustment> for FfiAdjustment {
    fn from(adjustment: &ProfileAdjustment) -> Self {
        let (kind, value) = adjustment.parts();
        Self {
            kind: kind.to_string(),
            value,
        }
    }
}

/// FFI-safe simulation outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSimulationOutcome {
    pub adjustments: Vec<FfiAdjustment>,
    pub baseline_monthly: f64,
    pub simulated_monthly: f64,
    pub monthly_delta: f64,
    pub baseline_annual: f64,
    pub simulated_annual: f64,
    pub annual_delta: f64,
    pub baseline_category: String,
    pub simulated_category: String,
    pub category_changed: bool,
}

impl From<SimulationOutcome> for FfiSimulationOutcome {
    fn from(outcome: SimulationOutcome) -> Self {
        Self {
            adjustments: outcome.adjustments.iter().map(FfiAdjustment::from).collect(),
            baseline_monthly: outcome.baseline_monthly,
            simulated_monthly: outcome.simulated_monthly,
            monthly_delta: outcome.monthly_delta(),
            baseline_annual: outcome.baseline_annual,
            simulated_annual: outcome.simulated_annual,
            annual_delta: outcome.annual_delta(),
            baseline_category: format!("{:?}", outcome.baseline_category),
            simulated_category: format!("{:?}", outcome.simulated_category),
            category_changed: outcome.category_changed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_profile_parses_labels() {
        let ffi = FfiClinicalProfile {
            age: Some(34.0),
            myoma_type: Some("Sub-mucosal".to_string()),
            tubal_patency: Some("unilateral obstruction".to_string()),
            endometriosis_stage: Some(2),
            ..FfiClinicalProfile::default()
        };
        let profile = ClinicalProfile::try_from(ffi).unwrap();
        assert_eq!(profile.myoma_type, Some(models::MyomaType::Submucosal));
        assert_eq!(profile.tubal_patency, Some(models::TubalPatency::UnilateralObstruction));
        assert_eq!(profile.endometriosis_stage, Some(EndometriosisStage::Mild));
    }

    #[test]
    fn test_ffi_profile_rejects_unknown_label() {
        let ffi = FfiClinicalProfile {
            age: Some(34.0),
            polyp: Some("several".to_string()),
            ..FfiClinicalProfile::default()
        };
        assert!(matches!(
            ClinicalProfile::try_from(ffi),
            Err(FertilityError::InvalidInput(_))
        ));

        let ffi = FfiClinicalProfile {
            age: Some(34.0),
            endometriosis_stage: Some(7),
            ..FfiClinicalProfile::default()
        };
        assert!(ClinicalProfile::try_from(ffi).is_err());
    }

    #[test]
    fn test_out_of_range_keeps_bounds_across_ffi() {
        let core = create_default_engine();
        let err = core
            .evaluate(FfiClinicalProfile {
                age: Some(10.0),
                ..FfiClinicalProfile::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            FertilityError::OutOfRange { value, min, max, .. } if value == 10.0 && min == 18.0 && max == 50.0
        ));
    }

    #[test]
    fn test_create_engine_from_partial_json() {
        let core = create_engine(r#"{"cycles_per_year": 6}"#.to_string()).unwrap();
        let result = core
            .evaluate(FfiClinicalProfile {
                age: Some(28.0),
                ..FfiClinicalProfile::default()
            })
            .unwrap();
        let expected = 1.0 - (1.0 - result.monthly_probability).powi(6);
        assert!((result.annual_probability - expected).abs() < 1e-12);

        assert!(matches!(
            create_engine("{not json".to_string()),
            Err(FertilityError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_evaluate_json() {
        let core = create_default_engine();
        let json = core.evaluate_json(r#"{"age": 30.0, "tsh": 5.0}"#.to_string()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["category"], "Moderate");
    }

    #[test]
    fn test_simulate_across_ffi() {
        let core = create_default_engine();
        let profile = FfiClinicalProfile {
            age: Some(31.0),
            bmi: Some(36.0),
            ..FfiClinicalProfile::default()
        };
        let suggestions = core.suggested_adjustments(profile.clone()).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, "set_bmi");

        let outcome = core.simulate(profile, suggestions).unwrap();
        assert!(outcome.monthly_delta > 0.0);
    }
}
