//! Golden tests for the fertility engine.
//!
//! End-to-end profiles with known outcomes.

use fertility_core::models::{
    ClinicalProfile, EndometriosisStage, FertilityCategory, PcosPhenotype, SemenAnalysis,
    TreatmentComplexity, TreatmentPath, UrgencyLevel,
};
use fertility_core::validation::{ClinicalField, MedicalCalculationError};
use fertility_core::FertilityEngine;

/// Expected outcome of a golden case.
enum Expected {
    Result {
        monthly_min: f64,
        monthly_max: f64,
        category: FertilityCategory,
        confidence: f64,
        forces_treatment_change: bool,
        path: TreatmentPath,
    },
    OutOfRange {
        field: ClinicalField,
        min: f64,
        max: f64,
    },
}

struct GoldenCase {
    id: &'static str,
    profile: ClinicalProfile,
    expected: Expected,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "age-only-28",
            profile: ClinicalProfile::new(28.0),
            expected: Expected::Result {
                monthly_min: 0.15,
                monthly_max: 0.25,
                category: FertilityCategory::Excellent,
                confidence: 0.35,
                forces_treatment_change: false,
                path: TreatmentPath::ExpectantManagement,
            },
        },
        GoldenCase {
            id: "critical-age-low-amh-occlusion",
            profile: ClinicalProfile {
                amh: Some(0.3),
                bilateral_tubal_occlusion: Some(true),
                ..ClinicalProfile::new(42.0)
            },
            expected: Expected::Result {
                monthly_min: 0.005,
                monthly_max: 0.005,
                category: FertilityCategory::Critical,
                confidence: 0.70,
                forces_treatment_change: true,
                path: TreatmentPath::IvfDonorOocytes,
            },
        },
        GoldenCase {
            id: "optimal-30",
            profile: ClinicalProfile {
                bmi: Some(22.0),
                amh: Some(2.0),
                tsh: Some(1.5),
                ..ClinicalProfile::new(30.0)
            },
            expected: Expected::Result {
                monthly_min: 0.18,
                monthly_max: 0.195,
                category: FertilityCategory::Good,
                confidence: 1.0,
                forces_treatment_change: false,
                path: TreatmentPath::ExpectantManagement,
            },
        },
        GoldenCase {
            id: "endometriosis-stage-3-age-37",
            profile: ClinicalProfile {
                endometriosis_stage: Some(EndometriosisStage::Moderate),
                ..ClinicalProfile::new(37.0)
            },
            expected: Expected::Result {
                monthly_min: 0.05,
                monthly_max: 0.06,
                category: FertilityCategory::Low,
                confidence: 0.35,
                forces_treatment_change: false,
                path: TreatmentPath::Iui,
            },
        },
        GoldenCase {
            id: "male-factor-maternal-age",
            profile: ClinicalProfile {
                semen: SemenAnalysis {
                    concentration: Some(10.0),
                    motility: Some(20.0),
                    morphology: Some(5.0),
                    ..SemenAnalysis::default()
                },
                ..ClinicalProfile::new(36.0)
            },
            expected: Expected::Result {
                monthly_min: 0.067,
                monthly_max: 0.068,
                category: FertilityCategory::Low,
                confidence: 0.35,
                forces_treatment_change: true,
                path: TreatmentPath::IvfIcsi,
            },
        },
        GoldenCase {
            id: "pcos-metabolic",
            profile: ClinicalProfile {
                bmi: Some(32.0),
                homa_ir: Some(3.0),
                has_pcos: Some(true),
                pcos_phenotype: Some(PcosPhenotype::A),
                ..ClinicalProfile::new(29.0)
            },
            expected: Expected::Result {
                monthly_min: 0.076,
                monthly_max: 0.078,
                category: FertilityCategory::Low,
                confidence: 0.65,
                forces_treatment_change: false,
                path: TreatmentPath::Iui,
            },
        },
        GoldenCase {
            id: "age-below-range",
            profile: ClinicalProfile::new(10.0),
            expected: Expected::OutOfRange {
                field: ClinicalField::Age,
                min: 18.0,
                max: 50.0,
            },
        },
        GoldenCase {
            id: "amh-above-range",
            profile: ClinicalProfile {
                amh: Some(14.0),
                ..ClinicalProfile::new(30.0)
            },
            expected: Expected::OutOfRange {
                field: ClinicalField::Amh,
                min: 0.1,
                max: 10.0,
            },
        },
    ]
}

#[test]
fn test_golden_cases() {
    let engine = FertilityEngine::default();

    for case in get_golden_cases() {
        let outcome = engine.evaluate(&case.profile);

        match case.expected {
            Expected::Result {
                monthly_min,
                monthly_max,
                category,
                confidence,
                forces_treatment_change,
                path,
            } => {
                let result = outcome.unwrap_or_else(|e| panic!("Case {}: unexpected error {}", case.id, e));
                assert!(
                    result.monthly_probability >= monthly_min - 1e-9
                        && result.monthly_probability <= monthly_max + 1e-9,
                    "Case {}: monthly {} outside [{}, {}]",
                    case.id, result.monthly_probability, monthly_min, monthly_max
                );
                assert_eq!(result.category, category, "Case {}: category mismatch", case.id);
                assert!(
                    (result.confidence - confidence).abs() < 0.001,
                    "Case {}: confidence mismatch - expected {}, got {}",
                    case.id, confidence, result.confidence
                );
                assert_eq!(
                    result.forces_treatment_change(),
                    forces_treatment_change,
                    "Case {}: forced treatment mismatch", case.id
                );
                assert_eq!(result.treatment_path, path, "Case {}: path mismatch", case.id);
            }
            Expected::OutOfRange { field, min, max } => match outcome {
                Err(MedicalCalculationError::OutOfRange {
                    field: actual,
                    min: actual_min,
                    max: actual_max,
                    ..
                }) => {
                    assert_eq!(actual, field, "Case {}: field mismatch", case.id);
                    assert_eq!((actual_min, actual_max), (min, max), "Case {}: bounds mismatch", case.id);
                }
                other => panic!("Case {}: expected range error, got {:?}", case.id, other),
            },
        }
    }
}

#[test]
fn test_critical_case_details() {
    let profile = ClinicalProfile {
        amh: Some(0.3),
        bilateral_tubal_occlusion: Some(true),
        ..ClinicalProfile::new(42.0)
    };
    let result = FertilityEngine::default().evaluate(&profile).unwrap();

    assert!((result.key_factors[&fertility_core::FactorAxis::Otb] - 0.01).abs() < 1e-12);
    assert!(result
        .interaction_report
        .interactions
        .iter()
        .any(|i| i.id == fertility_core::interactions::AGE_LOW_AMH));
    assert_eq!(result.treatment_complexity, TreatmentComplexity::VeryHigh);
    assert_eq!(result.urgency, UrgencyLevel::Urgent);
    assert_eq!(result.recommendations[0].id, "bilateral_tubal_ivf");
}

#[test]
fn test_range_error_message_cites_bounds() {
    let err = FertilityEngine::default()
        .evaluate(&ClinicalProfile::new(10.0))
        .unwrap_err();
    assert_eq!(err.to_string(), "Age value 10 is outside the valid range [18, 50]");
}

#[test]
fn test_annual_probability_compounds_monthly() {
    let result = FertilityEngine::default()
        .evaluate(&ClinicalProfile::new(30.0))
        .unwrap();
    let expected = 1.0 - (1.0 - result.monthly_probability).powi(12);
    assert!((result.annual_probability() - expected).abs() < 1e-12);
}
