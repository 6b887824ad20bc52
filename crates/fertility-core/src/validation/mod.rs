//! Profile validation.
//!
//! Three layers:
//! - range checks on every present numeric field (hard errors)
//! - cross-field consistency checks (soft warnings, attached to the result)
//! - availability analysis (confidence scoring, never an error)

mod availability;
mod ranges;

pub use availability::*;
pub use ranges::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConsistencyThresholds;
use crate::models::{ClinicalProfile, PcosPhenotype};

/// Reported and computed BMI may differ by this much before a warning.
const BMI_MISMATCH_TOLERANCE: f64 = 1.0;

/// Errors that abort a computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MedicalCalculationError {
    #[error("{field} value {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: ClinicalField,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Required field missing: {field}")]
    InsufficientData { field: ClinicalField },

    #[error("Calculation overflow in {stage}: {value} outside [{min}, {max}]")]
    CalculationOverflow {
        stage: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type CalculationResult<T> = Result<T, MedicalCalculationError>;

/// Non-fatal clinical consistency warnings.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MedicalValidationError {
    #[error("AMH {amh} ng/mL is unusual for age {age}; consider repeating the measurement")]
    AgeAmhInconsistency { age: f64, amh: f64 },

    #[error("Reported BMI {reported:.1} differs from height/weight BMI {computed:.1}")]
    BmiMismatch { reported: f64, computed: f64 },

    #[error("PCOS phenotype {phenotype} given without a PCOS diagnosis")]
    PhenotypeWithoutDiagnosis { phenotype: PcosPhenotype },

    #[error("Monthly probability {monthly:.3} deviates from the {subgroup} benchmark {expected:.3}")]
    BenchmarkDeviation {
        subgroup: String,
        monthly: f64,
        expected: f64,
    },
}

/// A profile whose numeric fields are all within range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    profile: ClinicalProfile,
    age: f64,
    bmi: Option<f64>,
    warnings: Vec<MedicalValidationError>,
}

impl ValidatedProfile {
    pub fn profile(&self) -> &ClinicalProfile {
        &self.profile
    }

    /// Validated female age.
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Effective BMI: reported value, else computed from height/weight.
    pub fn bmi(&self) -> Option<f64> {
        self.bmi
    }

    pub fn warnings(&self) -> &[MedicalValidationError] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<MedicalValidationError> {
        self.warnings
    }
}

/// Check a value against a field's valid range.
pub fn validate_range(field: ClinicalField, value: f64) -> CalculationResult<f64> {
    match field.range() {
        Some(range) if !range.contains(value) => Err(MedicalCalculationError::OutOfRange {
            field,
            value,
            min: range.min,
            max: range.max,
        }),
        _ => Ok(value),
    }
}

fn validate_optional(field: ClinicalField, value: Option<f64>) -> CalculationResult<()> {
    if let Some(v) = value {
        validate_range(field, v)?;
    }
    Ok(())
}

/// Cross-check age against AMH using the default thresholds.
pub fn validate_consistency(age: f64, amh: f64) -> Result<(), MedicalValidationError> {
    ConsistencyThresholds::default().check(age, amh)
}

/// Validate a profile with the default consistency thresholds.
pub fn validate(profile: &ClinicalProfile) -> CalculationResult<ValidatedProfile> {
    validate_with(profile, &ConsistencyThresholds::default())
}

/// Validate every present field of a profile.
///
/// Range errors abort at the first offending field. Consistency problems are
/// collected as warnings on the returned profile.
pub fn validate_with(
    profile: &ClinicalProfile,
    thresholds: &ConsistencyThresholds,
) -> CalculationResult<ValidatedProfile> {
    let age = profile.age.ok_or(MedicalCalculationError::InsufficientData {
        field: ClinicalField::Age,
    })?;
    validate_range(ClinicalField::Age, age)?;

    validate_optional(ClinicalField::Height, profile.height_cm)?;
    validate_optional(ClinicalField::Weight, profile.weight_kg)?;
    validate_optional(ClinicalField::Bmi, profile.bmi)?;
    validate_optional(ClinicalField::Amh, profile.amh)?;
    validate_optional(ClinicalField::Tsh, profile.tsh)?;
    validate_optional(ClinicalField::Prolactin, profile.prolactin)?;
    validate_optional(ClinicalField::HomaIr, profile.homa_ir)?;
    validate_optional(ClinicalField::CycleLength, profile.cycle_length_days)?;
    validate_optional(ClinicalField::InfertilityDuration, profile.infertility_duration_years)?;
    validate_optional(
        ClinicalField::PelvicSurgeryCount,
        profile.pelvic_surgery_count.map(f64::from),
    )?;
    validate_optional(ClinicalField::Parity, profile.parity.map(f64::from))?;
    validate_optional(ClinicalField::MyomaSize, profile.myoma_size_cm)?;

    let semen = &profile.semen;
    validate_optional(ClinicalField::SpermConcentration, semen.concentration)?;
    validate_optional(ClinicalField::SpermMotility, semen.motility)?;
    validate_optional(ClinicalField::SpermMorphology, semen.morphology)?;
    validate_optional(ClinicalField::DnaFragmentation, semen.dna_fragmentation)?;

    let mut warnings = Vec::new();

    let computed_bmi = match profile.computed_bmi() {
        Some(bmi) => Some(validate_range(ClinicalField::Bmi, bmi)?),
        None => None,
    };
    if let (Some(reported), Some(computed)) = (profile.bmi, computed_bmi) {
        if (reported - computed).abs() > BMI_MISMATCH_TOLERANCE {
            warnings.push(MedicalValidationError::BmiMismatch { reported, computed });
        }
    }

    if let Some(amh) = profile.amh {
        if let Err(warning) = thresholds.check(age, amh) {
            warnings.push(warning);
        }
    }

    if let (Some(false), Some(phenotype)) = (profile.has_pcos, profile.pcos_phenotype) {
        warnings.push(MedicalValidationError::PhenotypeWithoutDiagnosis { phenotype });
    }

    for warning in &warnings {
        tracing::warn!(%warning, "Profile consistency warning");
    }

    Ok(ValidatedProfile {
        profile: profile.clone(),
        age,
        bmi: profile.bmi.or(computed_bmi),
        warnings,
    })
}
