//! Probability synthesis.
//!
//! monthly = age × ∏ other factors × ∏ (1 - correction), clamped to the
//! configured [floor, ceiling]. The annual probability is always derived
//! from the clamped monthly value.

use crate::config::EngineConfig;
use crate::models::{combined_multiplier, FactorAxis, InteractionRecord, MedicalFactors};
use crate::validation::{CalculationResult, MedicalCalculationError};

/// Synthesized probability before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synthesis {
    /// Clamped monthly probability
    pub monthly: f64,
    /// Product before clamping
    pub unclamped: f64,
    /// Product of `(1 - correction)` applied
    pub interaction_multiplier: f64,
    /// Carried through from availability analysis
    pub confidence: f64,
}

impl Synthesis {
    /// Whether the floor or the ceiling was applied.
    pub fn was_clamped(&self) -> bool {
        self.monthly != self.unclamped
    }
}

/// Cumulative probability of conception over `cycles` independent cycles.
pub fn annual_probability(monthly: f64, cycles: u32) -> f64 {
    let exponent = i32::try_from(cycles).unwrap_or(i32::MAX);
    1.0 - (1.0 - monthly).powi(exponent)
}

/// Combine factors and interactions into a bounded monthly probability.
///
/// A factor outside its axis range, or a product that is not a probability,
/// means a calculator table is broken and aborts with `CalculationOverflow`.
pub fn synthesize(
    factors: &MedicalFactors,
    interactions: &[InteractionRecord],
    confidence: f64,
    config: &EngineConfig,
) -> CalculationResult<Synthesis> {
    let mut product = 1.0;
    for (axis, value) in factors.iter() {
        if !axis.accepts(value) {
            let info = axis.info();
            return Err(MedicalCalculationError::CalculationOverflow {
                stage: format!("{} factor", info.key),
                value,
                min: info.min,
                max: info.max,
            });
        }
        product *= value;
    }

    let interaction_multiplier = combined_multiplier(interactions);
    let unclamped = product * interaction_multiplier;
    if !unclamped.is_finite() || !(0.0..=1.0).contains(&unclamped) {
        return Err(MedicalCalculationError::CalculationOverflow {
            stage: "combined product".to_string(),
            value: unclamped,
            min: 0.0,
            max: 1.0,
        });
    }

    let monthly = unclamped.clamp(config.monthly_floor, config.monthly_ceiling);
    tracing::debug!(
        base = factors.get(FactorAxis::Age),
        interaction_multiplier,
        unclamped,
        monthly,
        "Synthesized monthly probability"
    );

    Ok(Synthesis {
        monthly,
        unclamped,
        interaction_multiplier,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn record(correction: f64) -> InteractionRecord {
        InteractionRecord {
            id: "test".to_string(),
            name: "Test".to_string(),
            trigger: "always".to_string(),
            correction,
            priority: Priority::Moderate,
            forces_treatment_change: false,
            forced_path: None,
        }
    }

    #[test]
    fn test_age_only_passes_through() {
        let s = synthesize(&MedicalFactors::neutral(0.209), &[], 0.35, &EngineConfig::default()).unwrap();
        assert!((s.monthly - 0.209).abs() < 1e-12);
        assert!(!s.was_clamped());
        assert_eq!(s.confidence, 0.35);
    }

    #[test]
    fn test_factors_and_interactions_multiply() {
        let mut factors = MedicalFactors::neutral(0.2);
        factors.bmi = 0.8;
        factors.amh = 0.5;
        let s = synthesize(&factors, &[record(0.5), record(0.2)], 1.0, &EngineConfig::default()).unwrap();
        // 0.2 * 0.8 * 0.5 * 0.5 * 0.8
        assert!((s.monthly - 0.032).abs() < 1e-12);
        assert!((s.interaction_multiplier - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_annual_probability_stays_bounded() {
        assert!((annual_probability(0.2, 12) - (1.0 - 0.8_f64.powi(12))).abs() < 1e-12);
        assert_eq!(annual_probability(0.2, 0), 0.0);
        for cycles in [u32::MAX, i32::MAX as u32 + 1] {
            let annual = annual_probability(0.195, cycles);
            assert!((0.0..=1.0).contains(&annual), "annual {} for {} cycles", annual, cycles);
        }
    }

    #[test]
    fn test_floor_clamp() {
        let mut factors = MedicalFactors::neutral(0.035);
        factors.otb = 0.01;
        let s = synthesize(&factors, &[record(0.35)], 0.5, &EngineConfig::default()).unwrap();
        assert_eq!(s.monthly, 0.005);
        assert!(s.was_clamped());
    }

    #[test]
    fn test_ceiling_clamp() {
        let mut factors = MedicalFactors::neutral(0.25);
        factors.parity = 1.05;
        let s = synthesize(&factors, &[], 0.5, &EngineConfig::default()).unwrap();
        assert_eq!(s.monthly, 0.25);
    }

    #[test]
    fn test_factor_out_of_axis_range_is_overflow() {
        let mut factors = MedicalFactors::neutral(0.2);
        factors.male = 1.3;
        let err = synthesize(&factors, &[], 0.5, &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            MedicalCalculationError::CalculationOverflow { ref stage, max, .. } if stage == "male factor" && max == 1.0
        ));
    }

    #[test]
    fn test_nan_factor_is_overflow() {
        let mut factors = MedicalFactors::neutral(0.2);
        factors.tsh = f64::NAN;
        assert!(synthesize(&factors, &[], 0.5, &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_annual_probability() {
        assert!((annual_probability(0.2, 12) - 0.9312).abs() < 0.0001);
        assert_eq!(annual_probability(0.0, 12), 0.0);
        assert!((annual_probability(0.1, 1) - 0.1).abs() < 1e-12);
    }
}
