//! Nonlinear interaction engine.
//!
//! Each rule is a predicate over two or more profile fields with a fixed
//! reduction. Rules are evaluated independently; every rule that fires
//! contributes a `(1 - correction)` term and the terms multiply.

mod rules;

pub use rules::*;

use crate::models::{InteractionRecord, InteractionReport, Priority, TreatmentPath};
use crate::validation::ValidatedProfile;

/// A static interaction rule.
#[derive(Debug, Clone, Copy)]
pub struct InteractionRule {
    pub id: &'static str,
    pub name: &'static str,
    /// Reduction in (0, 1]
    pub correction: f64,
    pub priority: Priority,
    pub forces_treatment_change: bool,
    pub forced_path: Option<TreatmentPath>,
    /// Returns a description of the triggering values when the rule fires
    pub detect: fn(&ValidatedProfile) -> Option<String>,
}

impl InteractionRule {
    /// Evaluate the rule against a profile.
    pub fn evaluate(&self, validated: &ValidatedProfile) -> Option<InteractionRecord> {
        (self.detect)(validated).map(|trigger| InteractionRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            trigger,
            correction: self.correction,
            priority: self.priority,
            forces_treatment_change: self.forces_treatment_change,
            forced_path: self.forced_path,
        })
    }
}

/// Detect every interaction triggered by a profile, in rule order.
pub fn detect_interactions(validated: &ValidatedProfile) -> Vec<InteractionRecord> {
    let detected: Vec<InteractionRecord> = INTERACTION_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(validated))
        .collect();

    for record in &detected {
        tracing::debug!(
            id = %record.id,
            correction = record.correction,
            priority = ?record.priority,
            "Interaction detected"
        );
    }
    detected
}

/// Detect interactions and summarize them.
pub fn generate_report(validated: &ValidatedProfile) -> InteractionReport {
    InteractionReport::from_records(detect_interactions(validated))
}
