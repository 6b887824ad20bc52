//! Male factor calculators.
//!
//! Basic semen parameters are first reduced to a severity class using the
//! WHO 2021 lower reference limits, then three independent modifiers (DNA
//! fragmentation, varicocele, seminal infection) are applied multiplicatively.

use serde::{Deserialize, Serialize};

use super::{lookup_or, Band};
use crate::models::SemenAnalysis;

/// Lower reference limit for concentration (million/mL).
pub const CONCENTRATION_LOWER_LIMIT: f64 = 16.0;
/// Lower reference limit for progressive motility (%).
pub const MOTILITY_LOWER_LIMIT: f64 = 30.0;
/// Lower reference limit for normal forms (%).
pub const MORPHOLOGY_LOWER_LIMIT: f64 = 4.0;

const VARICOCELE_FACTOR: f64 = 0.90;
const SEMINAL_INFECTION_FACTOR: f64 = 0.85;

/// DNA fragmentation index (%).
pub const DNA_FRAGMENTATION_BANDS: &[Band] = &[
    Band::constant(f64::NEG_INFINITY, 15.0, 1.0),
    Band::constant(15.0, 30.0, 0.90),
    Band::constant(30.0, 50.0, 0.75),
    Band::constant(50.0, f64::INFINITY, 0.60),
];

/// Severity of the semen alteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaleSeverity {
    Normal,
    /// One parameter below its reference limit
    Mild,
    /// Two parameters below their reference limits
    Moderate,
    /// All three parameters below their reference limits
    Severe,
    /// No spermatozoa in the ejaculate
    Azoospermia,
}

/// Number of measured parameters below their reference limit (0-3).
pub fn alteration_count(semen: &SemenAnalysis) -> u8 {
    let below = |value: Option<f64>, limit: f64| matches!(value, Some(v) if v < limit);
    [
        below(semen.concentration, CONCENTRATION_LOWER_LIMIT),
        below(semen.motility, MOTILITY_LOWER_LIMIT),
        below(semen.morphology, MORPHOLOGY_LOWER_LIMIT),
    ]
    .iter()
    .filter(|&&altered| altered)
    .count() as u8
}

/// Classify semen severity; `None` when no basic parameter was measured.
pub fn classify_severity(semen: &SemenAnalysis) -> Option<MaleSeverity> {
    if !semen.has_basic_parameters() {
        return None;
    }
    if semen.concentration == Some(0.0) {
        return Some(MaleSeverity::Azoospermia);
    }
    let severity = match alteration_count(semen) {
        0 => MaleSeverity::Normal,
        1 => MaleSeverity::Mild,
        2 => MaleSeverity::Moderate,
        _ => MaleSeverity::Severe,
    };
    Some(severity)
}

pub fn severity_factor(severity: MaleSeverity) -> f64 {
    match severity {
        MaleSeverity::Normal => 1.0,
        MaleSeverity::Mild => 0.85,
        MaleSeverity::Moderate => 0.65,
        MaleSeverity::Severe => 0.40,
        MaleSeverity::Azoospermia => 0.01,
    }
}

pub fn dna_fragmentation_factor(dfi: f64) -> f64 {
    lookup_or(DNA_FRAGMENTATION_BANDS, dfi, 0.60, "dna_fragmentation")
}

/// Combined male multiplier. Absent inputs contribute 1.0.
pub fn male_factor(semen: &SemenAnalysis) -> f64 {
    let severity = classify_severity(semen).map_or(1.0, severity_factor);
    let fragmentation = semen.dna_fragmentation.map_or(1.0, dna_fragmentation_factor);
    let varicocele = if semen.varicocele == Some(true) {
        VARICOCELE_FACTOR
    } else {
        1.0
    };
    let infection = if semen.seminal_culture_positive == Some(true) {
        SEMINAL_INFECTION_FACTOR
    } else {
        1.0
    };
    severity * fragmentation * varicocele * infection
}
