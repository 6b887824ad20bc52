//! Nonlinear interaction models.

use serde::{Deserialize, Serialize};

use super::result::TreatmentPath;

/// Clinical priority shared by interactions and recommendations.
///
/// Ordered from least to most pressing so `max()` yields the most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Moderate,
    High,
    Critical,
}

/// A detected nonlinear interaction between clinical factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    /// Stable rule identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// The condition that triggered the rule, with the observed values
    pub trigger: String,
    /// Reduction in (0, 1]; the synthesizer applies `1 - correction`
    pub correction: f64,
    pub priority: Priority,
    /// Overrides the default treatment path when set
    pub forces_treatment_change: bool,
    /// Path forced by this interaction, if it names one
    pub forced_path: Option<TreatmentPath>,
}

impl InteractionRecord {
    /// Multiplier contributed by this interaction.
    pub fn multiplier(&self) -> f64 {
        1.0 - self.correction
    }
}

/// Product of `(1 - correction)` over every record.
pub fn combined_multiplier(records: &[InteractionRecord]) -> f64 {
    records.iter().map(InteractionRecord::multiplier).product()
}

/// Summary of all interactions detected for a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionReport {
    /// Detected interactions, in rule order
    pub interactions: Vec<InteractionRecord>,
    /// Product of `(1 - correction)`; 1.0 when nothing triggered
    pub combined_multiplier: f64,
    /// Most severe priority among detected interactions
    pub highest_priority: Option<Priority>,
    /// Whether any interaction forces a treatment change
    pub forces_treatment_change: bool,
}

impl InteractionReport {
    /// Build a report from detected records.
    pub fn from_records(interactions: Vec<InteractionRecord>) -> Self {
        Self {
            combined_multiplier: combined_multiplier(&interactions),
            highest_priority: interactions.iter().map(|i| i.priority).max(),
            forces_treatment_change: interactions.iter().any(|i| i.forces_treatment_change),
            interactions,
        }
    }

    /// Most aggressive path forced by any interaction.
    pub fn forced_path(&self) -> Option<TreatmentPath> {
        self.interactions
            .iter()
            .filter(|i| i.forces_treatment_change)
            .filter_map(|i| i.forced_path)
            .max()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }
}
