//! Computation result models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::factors::FactorAxis;
use super::interaction::{InteractionReport, Priority};
use crate::benchmarks::BenchmarkReference;
use crate::validation::{DataAvailability, MedicalValidationError};

/// Qualitative fertility category, best first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FertilityCategory {
    Excellent,
    Good,
    Moderate,
    Low,
    VeryLow,
    Critical,
}

impl FertilityCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::VeryLow => "Very low",
            Self::Critical => "Critical",
        }
    }
}

/// Complexity of the indicated treatment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreatmentComplexity {
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// How soon the couple should be seen by a specialist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UrgencyLevel {
    /// Re-evaluate after 12 months of trying
    Routine,
    /// Evaluate within 6 months
    Soon,
    /// Refer to reproductive medicine now
    Priority,
    /// Start assisted reproduction without delay
    Urgent,
}

/// Treatment path, ordered by invasiveness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreatmentPath {
    /// Timed intercourse and lifestyle optimization
    ExpectantManagement,
    /// Letrozole or clomiphene with timed intercourse
    OvulationInduction,
    /// Intrauterine insemination
    Iui,
    /// In vitro fertilization
    Ivf,
    /// IVF with intracytoplasmic sperm injection
    IvfIcsi,
    /// IVF with donor oocyte counselling
    IvfDonorOocytes,
}

impl TreatmentPath {
    pub fn label(self) -> &'static str {
        match self {
            Self::ExpectantManagement => "Expectant management",
            Self::OvulationInduction => "Ovulation induction",
            Self::Iui => "Intrauterine insemination",
            Self::Ivf => "IVF",
            Self::IvfIcsi => "IVF-ICSI",
            Self::IvfDonorOocytes => "IVF with donor oocytes",
        }
    }
}

/// Therapeutic domain of a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecommendationCategory {
    Pharmacological,
    Surgical,
    Lifestyle,
    Diagnostic,
    Reproductive,
    Genetic,
}

/// Strength of the supporting evidence (A strongest).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvidenceLevel {
    A,
    B,
    C,
    D,
}

/// An evidence-cited clinical recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// Stable rule identifier
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: RecommendationCategory,
    pub evidence: EvidenceLevel,
    pub citations: Vec<String>,
    /// Factor axis that triggered the recommendation
    pub axis: Option<FactorAxis>,
}

/// Full output of one engine evaluation.
///
/// Owned by the caller; the engine keeps no reference to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComprehensiveFertilityResult {
    /// Per-cycle probability of conception, within the configured bounds
    pub monthly_probability: f64,
    /// Cycles used to derive the cumulative probability
    pub cycles_per_year: u32,
    pub category: FertilityCategory,
    pub treatment_complexity: TreatmentComplexity,
    pub urgency: UrgencyLevel,
    pub treatment_path: TreatmentPath,
    /// Age fecundability plus every non-neutral multiplier
    pub key_factors: BTreeMap<FactorAxis, f64>,
    /// Ranked, most pressing first
    pub recommendations: Vec<Recommendation>,
    /// Data completeness score in [0, 1]
    pub confidence: f64,
    pub availability: DataAvailability,
    pub interaction_report: InteractionReport,
    /// Non-fatal consistency warnings
    pub warnings: Vec<MedicalValidationError>,
    /// Subgroup reference data relevant to the profile
    pub benchmarks: Vec<BenchmarkReference>,
    /// SHA-256 of the canonical profile and engine version
    pub profile_fingerprint: String,
    pub engine_version: String,
}

impl ComprehensiveFertilityResult {
    /// Cumulative probability over `cycles_per_year` cycles.
    pub fn annual_probability(&self) -> f64 {
        crate::synthesis::annual_probability(self.monthly_probability, self.cycles_per_year)
    }

    /// Whether an interaction overrode the default treatment path.
    pub fn forces_treatment_change(&self) -> bool {
        self.interaction_report.forces_treatment_change
    }

    /// Whether any consistency warning was raised.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        assert!(FertilityCategory::Excellent < FertilityCategory::Good);
        assert!(FertilityCategory::VeryLow < FertilityCategory::Critical);
        assert_eq!(FertilityCategory::VeryLow.label(), "Very low");
    }

    #[test]
    fn test_treatment_path_order() {
        assert!(TreatmentPath::ExpectantManagement < TreatmentPath::Iui);
        assert!(TreatmentPath::Ivf < TreatmentPath::IvfIcsi);
        assert!(TreatmentPath::IvfIcsi < TreatmentPath::IvfDonorOocytes);
    }

    #[test]
    fn test_evidence_order() {
        assert!(EvidenceLevel::A < EvidenceLevel::D);
    }
}
