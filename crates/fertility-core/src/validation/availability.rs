//! Data availability analysis and confidence scoring.
//!
//! Missing fields are never errors. They lower the confidence score:
//!
//! - base: present core fields (age, AMH, TSH, BMI) / 4
//! - +0.10 per present critical field (age, AMH)
//! - +0.05 per present secondary field (TSH, BMI)
//! - capped at 1.0

use serde::{Deserialize, Serialize};

use super::ClinicalField;
use crate::models::ClinicalProfile;

const CORE_FIELDS: [ClinicalField; 4] = [
    ClinicalField::Age,
    ClinicalField::Amh,
    ClinicalField::Tsh,
    ClinicalField::Bmi,
];
const CRITICAL_FIELDS: [ClinicalField; 2] = [ClinicalField::Age, ClinicalField::Amh];
const SECONDARY_FIELDS: [ClinicalField; 2] = [ClinicalField::Tsh, ClinicalField::Bmi];

const CRITICAL_BONUS: f64 = 0.10;
const SECONDARY_BONUS: f64 = 0.05;

/// Which inputs were supplied and how much that supports the estimate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataAvailability {
    pub available: Vec<ClinicalField>,
    pub missing: Vec<ClinicalField>,
    /// Confidence score in [0, 1]
    pub confidence: f64,
}

impl DataAvailability {
    pub fn is_available(&self, field: ClinicalField) -> bool {
        self.available.contains(&field)
    }

    /// Share of reported fields that are present.
    pub fn completeness(&self) -> f64 {
        let total = self.available.len() + self.missing.len();
        if total == 0 {
            return 0.0;
        }
        self.available.len() as f64 / total as f64
    }
}

/// Whether the profile carries a value for `field`.
pub fn is_present(profile: &ClinicalProfile, field: ClinicalField) -> bool {
    let semen = &profile.semen;
    match field {
        ClinicalField::Age => profile.age.is_some(),
        ClinicalField::Height => profile.height_cm.is_some(),
        ClinicalField::Weight => profile.weight_kg.is_some(),
        ClinicalField::Bmi => profile.bmi.is_some() || profile.computed_bmi().is_some(),
        ClinicalField::Amh => profile.amh.is_some(),
        ClinicalField::Tsh => profile.tsh.is_some(),
        ClinicalField::Prolactin => profile.prolactin.is_some(),
        ClinicalField::HomaIr => profile.homa_ir.is_some(),
        ClinicalField::CycleLength => profile.cycle_length_days.is_some(),
        ClinicalField::InfertilityDuration => profile.infertility_duration_years.is_some(),
        ClinicalField::PelvicSurgeryCount => profile.pelvic_surgery_count.is_some(),
        ClinicalField::Parity => profile.parity.is_some(),
        ClinicalField::Pcos => profile.has_pcos.is_some() || profile.pcos_phenotype.is_some(),
        ClinicalField::Endometriosis => profile.endometriosis_stage.is_some(),
        ClinicalField::MyomaType => profile.myoma_type.is_some(),
        ClinicalField::MyomaSize => profile.myoma_size_cm.is_some(),
        ClinicalField::Adenomyosis => profile.adenomyosis.is_some(),
        ClinicalField::Polyp => profile.polyp.is_some(),
        ClinicalField::TubalPatency => {
            profile.tubal_patency.is_some() || profile.bilateral_tubal_occlusion.is_some()
        }
        ClinicalField::BilateralTubalOcclusion => profile.bilateral_tubal_occlusion.is_some(),
        ClinicalField::SpermConcentration => semen.concentration.is_some(),
        ClinicalField::SpermMotility => semen.motility.is_some(),
        ClinicalField::SpermMorphology => semen.morphology.is_some(),
        ClinicalField::DnaFragmentation => semen.dna_fragmentation.is_some(),
        ClinicalField::Varicocele => semen.varicocele.is_some(),
        ClinicalField::SeminalCulture => semen.seminal_culture_positive.is_some(),
    }
}

/// Enumerate available and missing inputs and score confidence.
pub fn validate_available_data(profile: &ClinicalProfile) -> DataAvailability {
    let (available, missing): (Vec<ClinicalField>, Vec<ClinicalField>) = ClinicalField::REPORTED
        .iter()
        .copied()
        .partition(|&field| is_present(profile, field));

    let count = |fields: &[ClinicalField]| fields.iter().filter(|&&f| is_present(profile, f)).count() as f64;

    let base = count(&CORE_FIELDS) / CORE_FIELDS.len() as f64;
    let confidence = (base
        + count(&CRITICAL_FIELDS) * CRITICAL_BONUS
        + count(&SECONDARY_FIELDS) * SECONDARY_BONUS)
        .min(1.0);

    DataAvailability {
        available,
        missing,
        confidence,
    }
}
