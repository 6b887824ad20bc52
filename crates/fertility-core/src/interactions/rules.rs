//! Interaction rule table.

use super::InteractionRule;
use crate::factors::{classify_severity, MaleSeverity};
use crate::models::{
    AdenomyosisType, EndometriosisStage, MyomaType, PolypType, Priority, TreatmentPath,
};
use crate::validation::ValidatedProfile;

pub const AGE_LOW_AMH: &str = "critical_age_low_amh";
pub const DEPLETED_RESERVE: &str = "depleted_reserve_very_advanced_age";
pub const ENDOMETRIOSIS_LOW_RESERVE: &str = "endometriosis_low_reserve";
pub const PCOS_METABOLIC: &str = "pcos_insulin_resistance_obesity";
pub const MALE_FACTOR_MATERNAL_AGE: &str = "male_factor_maternal_age";
pub const BILATERAL_TUBAL_BLOCK: &str = "bilateral_tubal_block";
pub const THYROID_PROLACTIN: &str = "thyroid_prolactin_axis";
pub const COMBINED_UTERINE: &str = "combined_uterine_pathology";
pub const AGE_LONG_DURATION: &str = "advanced_age_long_duration";
pub const FRAGMENTATION_AGE: &str = "dna_fragmentation_maternal_age";
pub const OBESITY_AGE: &str = "obesity_advanced_age";
pub const ADVANCED_AGE_UTERINE: &str = "advanced_age_uterine_pathology";
pub const BORDERLINE_THYROID_OLIGOMENORRHEA: &str = "borderline_tsh_oligomenorrhea";

/// Every interaction rule, evaluated in this order.
pub static INTERACTION_RULES: &[InteractionRule] = &[
    InteractionRule {
        id: AGE_LOW_AMH,
        name: "Advanced age with low ovarian reserve",
        correction: 0.35,
        priority: Priority::Critical,
        forces_treatment_change: true,
        forced_path: Some(TreatmentPath::Ivf),
        detect: age_low_amh,
    },
    InteractionRule {
        id: DEPLETED_RESERVE,
        name: "Depleted ovarian reserve at very advanced age",
        correction: 0.20,
        priority: Priority::Critical,
        forces_treatment_change: true,
        forced_path: Some(TreatmentPath::IvfDonorOocytes),
        detect: depleted_reserve,
    },
    InteractionRule {
        id: ENDOMETRIOSIS_LOW_RESERVE,
        name: "Advanced endometriosis with reduced ovarian reserve",
        correction: 0.25,
        priority: Priority::High,
        forces_treatment_change: true,
        forced_path: Some(TreatmentPath::Ivf),
        detect: endometriosis_low_reserve,
    },
    InteractionRule {
        id: PCOS_METABOLIC,
        name: "PCOS with insulin resistance and obesity",
        correction: 0.20,
        priority: Priority::High,
        forces_treatment_change: false,
        forced_path: None,
        detect: pcos_metabolic,
    },
    InteractionRule {
        id: MALE_FACTOR_MATERNAL_AGE,
        name: "Male factor with maternal age 35 or older",
        correction: 0.20,
        priority: Priority::High,
        forces_treatment_change: true,
        forced_path: Some(TreatmentPath::IvfIcsi),
        detect: male_factor_maternal_age,
    },
    InteractionRule {
        id: BILATERAL_TUBAL_BLOCK,
        name: "Bilateral tubal obstruction",
        correction: 0.10,
        priority: Priority::Critical,
        forces_treatment_change: true,
        forced_path: Some(TreatmentPath::Ivf),
        detect: bilateral_tubal_block,
    },
    InteractionRule {
        id: THYROID_PROLACTIN,
        name: "Hypothyroidism with hyperprolactinemia",
        correction: 0.10,
        priority: Priority::Moderate,
        forces_treatment_change: false,
        forced_path: None,
        detect: thyroid_prolactin,
    },
    InteractionRule {
        id: COMBINED_UTERINE,
        name: "Cavity lesion with adenomyosis",
        correction: 0.15,
        priority: Priority::High,
        forces_treatment_change: false,
        forced_path: None,
        detect: combined_uterine,
    },
    InteractionRule {
        id: AGE_LONG_DURATION,
        name: "Advanced age with prolonged infertility",
        correction: 0.10,
        priority: Priority::Moderate,
        forces_treatment_change: false,
        forced_path: None,
        detect: age_long_duration,
    },
    InteractionRule {
        id: FRAGMENTATION_AGE,
        name: "High sperm DNA fragmentation with maternal age 40 or older",
        correction: 0.15,
        priority: Priority::High,
        forces_treatment_change: true,
        forced_path: Some(TreatmentPath::IvfIcsi),
        detect: fragmentation_age,
    },
    InteractionRule {
        id: OBESITY_AGE,
        name: "Class II obesity with advanced age",
        correction: 0.10,
        priority: Priority::Moderate,
        forces_treatment_change: false,
        forced_path: None,
        detect: obesity_age,
    },
    InteractionRule {
        id: ADVANCED_AGE_UTERINE,
        name: "Age 40 or older with uterine or pelvic pathology",
        correction: 0.15,
        priority: Priority::High,
        forces_treatment_change: false,
        forced_path: None,
        detect: advanced_age_uterine,
    },
    InteractionRule {
        id: BORDERLINE_THYROID_OLIGOMENORRHEA,
        name: "Borderline TSH with oligomenorrhea",
        correction: 0.05,
        priority: Priority::Low,
        forces_treatment_change: false,
        forced_path: None,
        detect: borderline_thyroid_oligomenorrhea,
    },
];

fn age_low_amh(v: &ValidatedProfile) -> Option<String> {
    let amh = v.profile().amh?;
    (v.age() >= 38.0 && amh < 1.0).then(|| format!("age {:.1} >= 38 and AMH {:.2} < 1.0", v.age(), amh))
}

fn depleted_reserve(v: &ValidatedProfile) -> Option<String> {
    let amh = v.profile().amh?;
    (v.age() >= 42.0 && amh < 0.5).then(|| format!("age {:.1} >= 42 and AMH {:.2} < 0.5", v.age(), amh))
}

fn endometriosis_low_reserve(v: &ValidatedProfile) -> Option<String> {
    let stage = v.profile().endometriosis_stage?;
    let amh = v.profile().amh?;
    (stage >= EndometriosisStage::Moderate && amh < 1.5)
        .then(|| format!("endometriosis stage {} and AMH {:.2} < 1.5", stage.stage(), amh))
}

fn pcos_metabolic(v: &ValidatedProfile) -> Option<String> {
    let homa_ir = v.profile().homa_ir?;
    let bmi = v.bmi()?;
    (v.profile().pcos_present() && homa_ir >= 2.5 && bmi >= 30.0)
        .then(|| format!("PCOS with HOMA-IR {:.1} >= 2.5 and BMI {:.1} >= 30", homa_ir, bmi))
}

fn male_factor_maternal_age(v: &ValidatedProfile) -> Option<String> {
    let severity = classify_severity(&v.profile().semen)?;
    (severity >= MaleSeverity::Moderate && v.age() >= 35.0)
        .then(|| format!("{:?} male factor and age {:.1} >= 35", severity, v.age()))
}

fn bilateral_tubal_block(v: &ValidatedProfile) -> Option<String> {
    let profile = v.profile();
    profile
        .bilateral_occlusion()
        .then(|| match (profile.tubal_patency, profile.bilateral_tubal_occlusion) {
            (Some(patency), Some(true)) => format!("HSG {} and confirmed bilateral occlusion", patency),
            (_, Some(true)) => "confirmed bilateral occlusion".to_string(),
            _ => "HSG bilateral obstruction".to_string(),
        })
}

fn thyroid_prolactin(v: &ValidatedProfile) -> Option<String> {
    let tsh = v.profile().tsh?;
    let prolactin = v.profile().prolactin?;
    (tsh >= 4.0 && prolactin >= 25.0)
        .then(|| format!("TSH {:.2} >= 4.0 and prolactin {:.1} >= 25", tsh, prolactin))
}

fn combined_uterine(v: &ValidatedProfile) -> Option<String> {
    let profile = v.profile();
    let adenomyosis = profile.adenomyosis?;
    let cavity_lesion = profile.myoma_type == Some(MyomaType::Submucosal)
        || profile.polyp == Some(PolypType::Multiple);
    (cavity_lesion && adenomyosis != AdenomyosisType::None)
        .then(|| format!("intracavitary lesion with {} adenomyosis", adenomyosis))
}

fn age_long_duration(v: &ValidatedProfile) -> Option<String> {
    let years = v.profile().infertility_duration_years?;
    (v.age() >= 35.0 && years >= 2.0)
        .then(|| format!("age {:.1} >= 35 and {:.1} years of infertility", v.age(), years))
}

fn fragmentation_age(v: &ValidatedProfile) -> Option<String> {
    let dfi = v.profile().semen.dna_fragmentation?;
    (dfi >= 30.0 && v.age() >= 40.0)
        .then(|| format!("DNA fragmentation {:.0}% >= 30% and age {:.1} >= 40", dfi, v.age()))
}

fn obesity_age(v: &ValidatedProfile) -> Option<String> {
    let bmi = v.bmi()?;
    (bmi >= 35.0 && v.age() >= 35.0).then(|| format!("BMI {:.1} >= 35 and age {:.1} >= 35", bmi, v.age()))
}

fn advanced_age_uterine(v: &ValidatedProfile) -> Option<String> {
    if v.age() < 40.0 {
        return None;
    }
    let profile = v.profile();
    let mut findings = Vec::new();
    if matches!(profile.endometriosis_stage, Some(stage) if stage != EndometriosisStage::None) {
        findings.push("endometriosis");
    }
    if matches!(profile.myoma_type, Some(kind) if kind != MyomaType::None) {
        findings.push("myoma");
    }
    if matches!(profile.adenomyosis, Some(kind) if kind != AdenomyosisType::None) {
        findings.push("adenomyosis");
    }
    (!findings.is_empty()).then(|| format!("age {:.1} >= 40 with {}", v.age(), findings.join(", ")))
}

fn borderline_thyroid_oligomenorrhea(v: &ValidatedProfile) -> Option<String> {
    let tsh = v.profile().tsh?;
    let cycle = v.profile().cycle_length_days?;
    ((2.5..4.0).contains(&tsh) && cycle >= 36.0)
        .then(|| format!("TSH {:.2} in [2.5, 4.0) with {:.0}-day cycles", tsh, cycle))
}
