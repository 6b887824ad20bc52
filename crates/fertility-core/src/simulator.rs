//! Treatment simulator.
//!
//! Applies hypothetical corrections to a copy of a profile and re-runs the
//! engine to report "what-if" deltas. The input profile is never modified.

use serde::{Deserialize, Serialize};

use crate::engine::FertilityEngine;
use crate::models::{
    normalize_label, ClinicalProfile, FertilityCategory, MyomaType, ParseLabelError, PolypType,
};
use crate::validation::CalculationResult;

const TARGET_BMI: f64 = 22.0;
const TARGET_TSH: f64 = 1.5;
const TARGET_PROLACTIN: f64 = 15.0;
const TARGET_HOMA_IR: f64 = 1.5;
const TARGET_DNA_FRAGMENTATION: f64 = 10.0;

/// A hypothetical change to a clinical profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfileAdjustment {
    SetBmi(f64),
    SetTsh(f64),
    SetProlactin(f64),
    SetHomaIr(f64),
    ResectMyoma,
    RemovePolyps,
    TreatVaricocele,
    TreatSeminalInfection,
    ReduceDnaFragmentation(f64),
}

impl ProfileAdjustment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SetBmi(_) => "Reach a healthy BMI",
            Self::SetTsh(_) => "Normalize TSH",
            Self::SetProlactin(_) => "Normalize prolactin",
            Self::SetHomaIr(_) => "Improve insulin sensitivity",
            Self::ResectMyoma => "Myomectomy",
            Self::RemovePolyps => "Polypectomy",
            Self::TreatVaricocele => "Varicocele repair",
            Self::TreatSeminalInfection => "Treat seminal infection",
            Self::ReduceDnaFragmentation(_) => "Reduce sperm DNA fragmentation",
        }
    }

    /// Build from a kind label and an optional target value.
    ///
    /// Value-carrying kinds use their default target when `value` is `None`.
    pub fn from_parts(kind: &str, value: Option<f64>) -> Result<Self, ParseLabelError> {
        let adjustment = match normalize_label(kind).as_str() {
            "setbmi" => Self::SetBmi(value.unwrap_or(TARGET_BMI)),
            "settsh" => Self::SetTsh(value.unwrap_or(TARGET_TSH)),
            "setprolactin" => Self::SetProlactin(value.unwrap_or(TARGET_PROLACTIN)),
            "sethomair" => Self::SetHomaIr(value.unwrap_or(TARGET_HOMA_IR)),
            "resectmyoma" => Self::ResectMyoma,
            "removepolyps" => Self::RemovePolyps,
            "treatvaricocele" => Self::TreatVaricocele,
            "treatseminalinfection" => Self::TreatSeminalInfection,
            "reducednafragmentation" => {
                Self::ReduceDnaFragmentation(value.unwrap_or(TARGET_DNA_FRAGMENTATION))
            }
            _ => return Err(ParseLabelError::new("profile adjustment", kind)),
        };
        Ok(adjustment)
    }

    /// Kind label and target value, the inverse of [`Self::from_parts`].
    pub fn parts(&self) -> (&'static str, Option<f64>) {
        match *self {
            Self::SetBmi(v) => ("set_bmi", Some(v)),
            Self::SetTsh(v) => ("set_tsh", Some(v)),
            Self::SetProlactin(v) => ("set_prolactin", Some(v)),
            Self::SetHomaIr(v) => ("set_homa_ir", Some(v)),
            Self::ResectMyoma => ("resect_myoma", None),
            Self::RemovePolyps => ("remove_polyps", None),
            Self::TreatVaricocele => ("treat_varicocele", None),
            Self::TreatSeminalInfection => ("treat_seminal_infection", None),
            Self::ReduceDnaFragmentation(v) => ("reduce_dna_fragmentation", Some(v)),
        }
    }

    /// Apply to a profile in place.
    pub fn apply(&self, profile: &mut ClinicalProfile) {
        match *self {
            Self::SetBmi(bmi) => {
                profile.bmi = Some(bmi);
                // Keep height/weight consistent with the new BMI.
                if let Some(height) = profile.height_cm {
                    let meters = height / 100.0;
                    profile.weight_kg = Some(bmi * meters * meters);
                }
            }
            Self::SetTsh(tsh) => profile.tsh = Some(tsh),
            Self::SetProlactin(prolactin) => profile.prolactin = Some(prolactin),
            Self::SetHomaIr(homa_ir) => profile.homa_ir = Some(homa_ir),
            Self::ResectMyoma => {
                profile.myoma_type = Some(MyomaType::None);
                profile.myoma_size_cm = None;
            }
            Self::RemovePolyps => profile.polyp = Some(PolypType::None),
            Self::TreatVaricocele => profile.semen.varicocele = Some(false),
            Self::TreatSeminalInfection => profile.semen.seminal_culture_positive = Some(false),
            Self::ReduceDnaFragmentation(dfi) => profile.semen.dna_fragmentation = Some(dfi),
        }
    }
}

/// Adjustments that would change something for this profile.
pub fn suggested_scenarios(profile: &ClinicalProfile) -> Vec<ProfileAdjustment> {
    let mut scenarios = Vec::new();
    let bmi = profile.bmi.or_else(|| profile.computed_bmi());
    if bmi.is_some_and(|b| !(18.5..25.0).contains(&b)) {
        scenarios.push(ProfileAdjustment::SetBmi(TARGET_BMI));
    }
    if profile.tsh.is_some_and(|t| t >= 2.5) {
        scenarios.push(ProfileAdjustment::SetTsh(TARGET_TSH));
    }
    if profile.prolactin.is_some_and(|p| p >= 25.0) {
        scenarios.push(ProfileAdjustment::SetProlactin(TARGET_PROLACTIN));
    }
    if profile.homa_ir.is_some_and(|h| h >= 2.5) {
        scenarios.push(ProfileAdjustment::SetHomaIr(TARGET_HOMA_IR));
    }
    if matches!(profile.myoma_type, Some(kind) if kind != MyomaType::None) {
        scenarios.push(ProfileAdjustment::ResectMyoma);
    }
    if matches!(profile.polyp, Some(kind) if kind != PolypType::None) {
        scenarios.push(ProfileAdjustment::RemovePolyps);
    }
    if profile.semen.varicocele == Some(true) {
        scenarios.push(ProfileAdjustment::TreatVaricocele);
    }
    if profile.semen.seminal_culture_positive == Some(true) {
        scenarios.push(ProfileAdjustment::TreatSeminalInfection);
    }
    if profile.semen.dna_fragmentation.is_some_and(|dfi| dfi >= 15.0) {
        scenarios.push(ProfileAdjustment::ReduceDnaFragmentation(TARGET_DNA_FRAGMENTATION));
    }
    scenarios
}

/// Baseline versus simulated outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationOutcome {
    pub adjustments: Vec<ProfileAdjustment>,
    pub baseline_monthly: f64,
    pub simulated_monthly: f64,
    pub baseline_annual: f64,
    pub simulated_annual: f64,
    pub baseline_category: FertilityCategory,
    pub simulated_category: FertilityCategory,
}

impl SimulationOutcome {
    pub fn monthly_delta(&self) -> f64 {
        self.simulated_monthly - self.baseline_monthly
    }

    pub fn annual_delta(&self) -> f64 {
        self.simulated_annual - self.baseline_annual
    }

    pub fn category_changed(&self) -> bool {
        self.baseline_category != self.simulated_category
    }
}

/// Re-runs the engine on adjusted copies of a profile.
pub struct TreatmentSimulator<'a> {
    engine: &'a FertilityEngine,
}

impl<'a> TreatmentSimulator<'a> {
    pub fn new(engine: &'a FertilityEngine) -> Self {
        Self { engine }
    }

    /// Apply all adjustments together and compare with the baseline.
    pub fn simulate(
        &self,
        profile: &ClinicalProfile,
        adjustments: &[ProfileAdjustment],
    ) -> CalculationResult<SimulationOutcome> {
        let baseline = self.engine.evaluate(profile)?;

        let mut adjusted = profile.clone();
        for adjustment in adjustments {
            adjustment.apply(&mut adjusted);
        }
        let simulated = self.engine.evaluate(&adjusted)?;

        tracing::debug!(
            adjustments = adjustments.len(),
            baseline = baseline.monthly_probability,
            simulated = simulated.monthly_probability,
            "Simulated treatment scenario"
        );

        Ok(SimulationOutcome {
            adjustments: adjustments.to_vec(),
            baseline_monthly: baseline.monthly_probability,
            simulated_monthly: simulated.monthly_probability,
            baseline_annual: baseline.annual_probability(),
            simulated_annual: simulated.annual_probability(),
            baseline_category: baseline.category,
            simulated_category: simulated.category,
        })
    }

    /// Simulate each suggested scenario on its own.
    pub fn simulate_suggestions(
        &self,
        profile: &ClinicalProfile,
    ) -> CalculationResult<Vec<SimulationOutcome>> {
        suggested_scenarios(profile)
            .into_iter()
            .map(|adjustment| self.simulate(profile, &[adjustment]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SemenAnalysis;

    #[test]
    fn test_no_suggestions_for_optimal_profile() {
        let mut profile = ClinicalProfile::new(30.0);
        profile.bmi = Some(22.0);
        profile.tsh = Some(1.5);
        assert!(suggested_scenarios(&profile).is_empty());
    }

    #[test]
    fn test_suggestions_follow_findings() {
        let mut profile = ClinicalProfile::new(32.0);
        profile.bmi = Some(33.0);
        profile.tsh = Some(5.0);
        profile.myoma_type = Some(MyomaType::Submucosal);
        profile.semen = SemenAnalysis {
            varicocele: Some(true),
            ..SemenAnalysis::default()
        };
        assert_eq!(
            suggested_scenarios(&profile),
            vec![
                ProfileAdjustment::SetBmi(22.0),
                ProfileAdjustment::SetTsh(1.5),
                ProfileAdjustment::ResectMyoma,
                ProfileAdjustment::TreatVaricocele,
            ]
        );
    }

    #[test]
    fn test_simulation_improves_probability() {
        let engine = FertilityEngine::default();
        let simulator = TreatmentSimulator::new(&engine);

        let mut profile = ClinicalProfile::new(30.0);
        profile.tsh = Some(6.0);
        profile.myoma_type = Some(MyomaType::Submucosal);
        profile.myoma_size_cm = Some(2.0);

        let outcome = simulator
            .simulate(&profile, &[ProfileAdjustment::SetTsh(1.5), ProfileAdjustment::ResectMyoma])
            .unwrap();
        // 0.195 * 0.75 * 0.5 → 0.195
        assert!((outcome.baseline_monthly - 0.073125).abs() < 1e-9);
        assert!((outcome.simulated_monthly - 0.195).abs() < 1e-9);
        assert!(outcome.monthly_delta() > 0.0);
        assert!(outcome.annual_delta() > 0.0);
        assert!(outcome.category_changed());
        assert_eq!(profile.tsh, Some(6.0));
    }

    #[test]
    fn test_set_bmi_keeps_weight_consistent() {
        let mut profile = ClinicalProfile::new(30.0);
        profile.height_cm = Some(160.0);
        profile.weight_kg = Some(90.0);
        ProfileAdjustment::SetBmi(22.0).apply(&mut profile);
        let computed = profile.computed_bmi().unwrap();
        assert!((computed - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_simulate_suggestions_one_per_scenario() {
        let engine = FertilityEngine::default();
        let mut profile = ClinicalProfile::new(34.0);
        profile.prolactin = Some(60.0);
        profile.polyp = Some(PolypType::Multiple);

        let outcomes = TreatmentSimulator::new(&engine).simulate_suggestions(&profile).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.adjustments.len() == 1 && o.monthly_delta() > 0.0));
    }

    #[test]
    fn test_adjustment_from_parts() {
        assert_eq!(
            ProfileAdjustment::from_parts("set_bmi", Some(24.0)).unwrap(),
            ProfileAdjustment::SetBmi(24.0)
        );
        assert_eq!(
            ProfileAdjustment::from_parts("Reduce DNA Fragmentation", None).unwrap(),
            ProfileAdjustment::ReduceDnaFragmentation(10.0)
        );
        assert!(ProfileAdjustment::from_parts("homeopathy", None).is_err());
    }
}
