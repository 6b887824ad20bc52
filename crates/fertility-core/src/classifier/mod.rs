//! Category, treatment tier and recommendation classification.
//!
//! Category thresholds on the monthly probability:
//!
//! | monthly        | category  |
//! |----------------|-----------|
//! | >= 0.20        | Excellent |
//! | [0.15, 0.20)   | Good      |
//! | [0.10, 0.15)   | Moderate  |
//! | [0.05, 0.10)   | Low       |
//! | [0.02, 0.05)   | VeryLow   |
//! | < 0.02         | Critical  |
//!
//! A forcing interaction raises complexity, urgency and treatment path
//! regardless of the probability.

mod recommendations;

pub use recommendations::*;

use crate::models::{
    FertilityCategory, InteractionReport, Priority, TreatmentComplexity, TreatmentPath,
    UrgencyLevel,
};
use crate::validation::ValidatedProfile;

/// Lower bound of each category, best first. Anything below the last is critical.
const CATEGORY_THRESHOLDS: [(f64, FertilityCategory); 5] = [
    (0.20, FertilityCategory::Excellent),
    (0.15, FertilityCategory::Good),
    (0.10, FertilityCategory::Moderate),
    (0.05, FertilityCategory::Low),
    (0.02, FertilityCategory::VeryLow),
];

/// Age from which expectant management warrants an earlier review.
const ADVANCED_MATERNAL_AGE: f64 = 35.0;

/// Cycle length from which ovulatory dysfunction is assumed.
const OLIGOMENORRHEA_DAYS: f64 = 36.0;

/// Treatment tier derived from the probability and interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: FertilityCategory,
    pub complexity: TreatmentComplexity,
    pub urgency: UrgencyLevel,
    pub path: TreatmentPath,
}

/// Map a monthly probability to its category.
pub fn classify_category(monthly: f64) -> FertilityCategory {
    CATEGORY_THRESHOLDS
        .iter()
        .find(|(lower, _)| monthly >= *lower)
        .map_or(FertilityCategory::Critical, |(_, category)| *category)
}

fn has_ovulatory_disorder(validated: &ValidatedProfile) -> bool {
    let profile = validated.profile();
    profile.pcos_present()
        || profile
            .cycle_length_days
            .is_some_and(|days| days >= OLIGOMENORRHEA_DAYS)
}

/// Tier implied by the category alone.
pub fn default_tier(
    category: FertilityCategory,
    validated: &ValidatedProfile,
) -> (TreatmentComplexity, UrgencyLevel, TreatmentPath) {
    match category {
        FertilityCategory::Excellent | FertilityCategory::Good => {
            let urgency = if validated.age() >= ADVANCED_MATERNAL_AGE {
                UrgencyLevel::Soon
            } else {
                UrgencyLevel::Routine
            };
            (TreatmentComplexity::Low, urgency, TreatmentPath::ExpectantManagement)
        }
        FertilityCategory::Moderate => {
            let path = if has_ovulatory_disorder(validated) {
                TreatmentPath::OvulationInduction
            } else {
                TreatmentPath::Iui
            };
            (TreatmentComplexity::Moderate, UrgencyLevel::Soon, path)
        }
        FertilityCategory::Low => (
            TreatmentComplexity::Moderate,
            UrgencyLevel::Soon,
            TreatmentPath::Iui,
        ),
        FertilityCategory::VeryLow => (
            TreatmentComplexity::High,
            UrgencyLevel::Priority,
            TreatmentPath::Ivf,
        ),
        FertilityCategory::Critical => (
            TreatmentComplexity::VeryHigh,
            UrgencyLevel::Urgent,
            TreatmentPath::Ivf,
        ),
    }
}

/// Classify a synthesized probability.
pub fn classify(
    monthly: f64,
    validated: &ValidatedProfile,
    report: &InteractionReport,
) -> Classification {
    let category = classify_category(monthly);
    let (mut complexity, mut urgency, mut path) = default_tier(category, validated);

    if report.forces_treatment_change {
        let forced_urgency = if report.highest_priority == Some(Priority::Critical) {
            UrgencyLevel::Urgent
        } else {
            UrgencyLevel::Priority
        };
        complexity = complexity.max(TreatmentComplexity::High);
        urgency = urgency.max(forced_urgency);
        path = path.max(report.forced_path().unwrap_or(TreatmentPath::Ivf));

        tracing::debug!(
            ?category,
            ?path,
            "Treatment path overridden by interaction"
        );
    }

    Classification {
        category,
        complexity,
        urgency,
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::generate_report;
    use crate::models::{ClinicalProfile, PcosPhenotype, TubalPatency};
    use crate::validation::validate;

    #[test]
    fn test_category_thresholds() {
        assert_eq!(classify_category(0.25), FertilityCategory::Excellent);
        assert_eq!(classify_category(0.20), FertilityCategory::Excellent);
        assert_eq!(classify_category(0.1999), FertilityCategory::Good);
        assert_eq!(classify_category(0.15), FertilityCategory::Good);
        assert_eq!(classify_category(0.10), FertilityCategory::Moderate);
        assert_eq!(classify_category(0.055), FertilityCategory::Low);
        assert_eq!(classify_category(0.02), FertilityCategory::VeryLow);
        assert_eq!(classify_category(0.0199), FertilityCategory::Critical);
        assert_eq!(classify_category(0.005), FertilityCategory::Critical);
    }

    #[test]
    fn test_category_monotone() {
        let mut previous = FertilityCategory::Excellent;
        for step in (0..=250).rev() {
            let category = classify_category(step as f64 / 1000.0);
            assert!(category >= previous);
            previous = category;
        }
    }

    #[test]
    fn test_default_tier_for_young_excellent() {
        let validated = validate(&ClinicalProfile::new(28.0)).unwrap();
        let report = generate_report(&validated);
        let c = classify(0.209, &validated, &report);
        assert_eq!(c.category, FertilityCategory::Excellent);
        assert_eq!(c.complexity, TreatmentComplexity::Low);
        assert_eq!(c.urgency, UrgencyLevel::Routine);
        assert_eq!(c.path, TreatmentPath::ExpectantManagement);
    }

    #[test]
    fn test_good_category_after_35_is_seen_sooner() {
        let validated = validate(&ClinicalProfile::new(36.0)).unwrap();
        let report = generate_report(&validated);
        assert_eq!(classify(0.16, &validated, &report).urgency, UrgencyLevel::Soon);
    }

    #[test]
    fn test_moderate_with_pcos_prefers_ovulation_induction() {
        let mut profile = ClinicalProfile::new(29.0);
        profile.has_pcos = Some(true);
        profile.pcos_phenotype = Some(PcosPhenotype::A);
        let validated = validate(&profile).unwrap();
        let report = generate_report(&validated);
        assert_eq!(classify(0.12, &validated, &report).path, TreatmentPath::OvulationInduction);

        let plain = validate(&ClinicalProfile::new(29.0)).unwrap();
        assert_eq!(classify(0.12, &plain, &generate_report(&plain)).path, TreatmentPath::Iui);
    }

    #[test]
    fn test_bilateral_occlusion_forces_ivf_with_favorable_probability() {
        let mut profile = ClinicalProfile::new(27.0);
        profile.tubal_patency = Some(TubalPatency::BilateralObstruction);
        let validated = validate(&profile).unwrap();
        let report = generate_report(&validated);

        let c = classify(0.21, &validated, &report);
        assert_eq!(c.category, FertilityCategory::Excellent);
        assert_eq!(c.complexity, TreatmentComplexity::High);
        assert_eq!(c.urgency, UrgencyLevel::Urgent);
        assert_eq!(c.path, TreatmentPath::Ivf);
    }

    #[test]
    fn test_forced_path_never_downgrades() {
        let mut profile = ClinicalProfile::new(42.0);
        profile.amh = Some(0.3);
        let validated = validate(&profile).unwrap();
        let report = generate_report(&validated);

        let c = classify(0.005, &validated, &report);
        assert_eq!(c.category, FertilityCategory::Critical);
        assert_eq!(c.complexity, TreatmentComplexity::VeryHigh);
        assert_eq!(c.path, TreatmentPath::IvfDonorOocytes);
    }
}
