//! Evidence-cited recommendation rules.
//!
//! One rule per actionable finding. Rules without their own citations fall
//! back to the defaults of their category.

use crate::factors::{classify_severity, MaleSeverity};
use crate::models::{
    AdenomyosisType, EndometriosisStage, EvidenceLevel, FactorAxis, MedicalFactors, MyomaType,
    PolypType, Priority, Recommendation, RecommendationCategory, TubalPatency,
};
use crate::validation::ValidatedProfile;

const ASRM_FERTILITY_EVALUATION: &str =
    "Practice Committee of the ASRM. Fertility evaluation of infertile women: a committee opinion. Fertil Steril 2021;116:1255-65.";
const ASRM_OVARIAN_RESERVE: &str =
    "Practice Committee of the ASRM. Testing and interpreting measures of ovarian reserve. Fertil Steril 2020;114:1151-57.";
const ASRM_OBESITY: &str =
    "Practice Committee of the ASRM. Obesity and reproduction: a committee opinion. Fertil Steril 2021;116:1266-85.";
const ASRM_SUBCLINICAL_HYPOTHYROIDISM: &str =
    "Practice Committee of the ASRM. Subclinical hypothyroidism in the infertile female population: a guideline. Fertil Steril 2015;104:545-53.";
const PCOS_GUIDELINE: &str =
    "Teede HJ et al. Recommendations from the 2023 International Evidence-based Guideline for the Assessment and Management of PCOS. Fertil Steril 2023;120:767-93.";
const LETROZOLE_TRIAL: &str =
    "Legro RS et al. Letrozole versus clomiphene for infertility in the polycystic ovary syndrome. N Engl J Med 2014;371:119-29.";
const ESHRE_ENDOMETRIOSIS: &str = "Becker CM et al. ESHRE guideline: endometriosis. Hum Reprod Open 2022;2022:hoac009.";
const FIBROID_REVIEW: &str =
    "Pritts EA et al. Fibroids and infertility: an updated systematic review of the evidence. Fertil Steril 2009;91:1215-23.";
const WHO_SEMEN_MANUAL: &str =
    "World Health Organization. WHO laboratory manual for the examination and processing of human semen, 6th ed. 2021.";
const DNA_FRAGMENTATION_GUIDELINE: &str =
    "Agarwal A et al. Sperm DNA fragmentation: a new guideline for clinicians. World J Mens Health 2020;38:412-71.";
const AUA_ASRM_MALE_INFERTILITY: &str =
    "Schlegel PN et al. Diagnosis and treatment of infertility in men: AUA/ASRM guideline. Fertil Steril 2021;115:54-61.";
const ESHRE_PGT: &str = "ESHRE PGT Consortium. Good practice recommendations for PGT. Hum Reprod Open 2020;2020:hoaa021.";

/// Citations used when a rule supplies none.
pub fn default_citations(category: RecommendationCategory) -> &'static [&'static str] {
    match category {
        RecommendationCategory::Pharmacological => &[ASRM_FERTILITY_EVALUATION],
        RecommendationCategory::Surgical => &[ASRM_FERTILITY_EVALUATION, FIBROID_REVIEW],
        RecommendationCategory::Lifestyle => &[ASRM_OBESITY],
        RecommendationCategory::Diagnostic => &[ASRM_FERTILITY_EVALUATION],
        RecommendationCategory::Reproductive => &[ASRM_FERTILITY_EVALUATION, ASRM_OVARIAN_RESERVE],
        RecommendationCategory::Genetic => &[ESHRE_PGT],
    }
}

/// A static recommendation rule.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationRule {
    pub id: &'static str,
    pub axis: Option<FactorAxis>,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
    pub category: RecommendationCategory,
    pub evidence: EvidenceLevel,
    /// Empty means the category defaults apply
    pub citations: &'static [&'static str],
    pub applies: fn(&ValidatedProfile, &MedicalFactors) -> bool,
}

impl RecommendationRule {
    fn to_recommendation(&self) -> Recommendation {
        let citations = if self.citations.is_empty() {
            default_citations(self.category)
        } else {
            self.citations
        };
        Recommendation {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            priority: self.priority,
            category: self.category,
            evidence: self.evidence,
            citations: citations.iter().map(|c| c.to_string()).collect(),
            axis: self.axis,
        }
    }
}

fn below_neutral(factors: &MedicalFactors, axis: FactorAxis) -> bool {
    factors.get(axis) < 1.0
}

fn male_severity(v: &ValidatedProfile) -> Option<MaleSeverity> {
    classify_severity(&v.profile().semen)
}

pub static RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        id: "expedited_evaluation_age",
        axis: Some(FactorAxis::Age),
        title: "Expedited fertility evaluation",
        description: "From age 35, start a full fertility work-up after 6 months of trying rather than 12.",
        priority: Priority::High,
        category: RecommendationCategory::Reproductive,
        evidence: EvidenceLevel::A,
        citations: &[ASRM_FERTILITY_EVALUATION],
        applies: |v, _| (35.0..40.0).contains(&v.age()),
    },
    RecommendationRule {
        id: "immediate_evaluation_advanced_age",
        axis: Some(FactorAxis::Age),
        title: "Immediate fertility evaluation with aneuploidy counselling",
        description: "From age 40, start the work-up without a waiting period and discuss the age-related rise in embryo aneuploidy and the role of preimplantation genetic testing.",
        priority: Priority::High,
        category: RecommendationCategory::Reproductive,
        evidence: EvidenceLevel::A,
        citations: &[ASRM_FERTILITY_EVALUATION, ESHRE_PGT],
        applies: |v, _| v.age() >= 40.0,
    },
    RecommendationRule {
        id: "weight_loss_obesity",
        axis: Some(FactorAxis::Bmi),
        title: "Structured weight-loss programme",
        description: "A 5-10% weight reduction restores ovulation and improves treatment outcomes in obesity.",
        priority: Priority::High,
        category: RecommendationCategory::Lifestyle,
        evidence: EvidenceLevel::A,
        citations: &[ASRM_OBESITY],
        applies: |v, _| v.bmi().is_some_and(|bmi| bmi >= 30.0),
    },
    RecommendationRule {
        id: "weight_optimization_overweight",
        axis: Some(FactorAxis::Bmi),
        title: "Diet and exercise counselling",
        description: "Aim for a BMI between 20 and 25 through diet and regular physical activity.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Lifestyle,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |v, _| v.bmi().is_some_and(|bmi| (25.0..30.0).contains(&bmi)),
    },
    RecommendationRule {
        id: "weight_gain_underweight",
        axis: Some(FactorAxis::Bmi),
        title: "Nutritional support for low body weight",
        description: "Low BMI is associated with hypothalamic anovulation; nutritional counselling is advised.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Lifestyle,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |v, _| v.bmi().is_some_and(|bmi| bmi < 18.5),
    },
    RecommendationRule {
        id: "low_ovarian_reserve",
        axis: Some(FactorAxis::Amh),
        title: "Early referral for reduced ovarian reserve",
        description: "Low AMH predicts a reduced response to stimulation; avoid delaying assisted reproduction.",
        priority: Priority::High,
        category: RecommendationCategory::Reproductive,
        evidence: EvidenceLevel::B,
        citations: &[ASRM_OVARIAN_RESERVE],
        applies: |v, _| v.profile().amh.is_some_and(|amh| amh < 1.0),
    },
    RecommendationRule {
        id: "measure_amh",
        axis: None,
        title: "Measure AMH",
        description: "An AMH measurement refines the estimate and guides the choice of treatment.",
        priority: Priority::Low,
        category: RecommendationCategory::Diagnostic,
        evidence: EvidenceLevel::B,
        citations: &[ASRM_OVARIAN_RESERVE],
        applies: |v, _| v.profile().amh.is_none(),
    },
    RecommendationRule {
        id: "levothyroxine",
        axis: Some(FactorAxis::Tsh),
        title: "Treat hypothyroidism",
        description: "Start levothyroxine and target a TSH below 2.5 mIU/L before conception.",
        priority: Priority::High,
        category: RecommendationCategory::Pharmacological,
        evidence: EvidenceLevel::A,
        citations: &[ASRM_SUBCLINICAL_HYPOTHYROIDISM],
        applies: |v, _| v.profile().tsh.is_some_and(|tsh| tsh >= 4.0),
    },
    RecommendationRule {
        id: "thyroid_antibodies",
        axis: Some(FactorAxis::Tsh),
        title: "Repeat TSH with thyroid antibodies",
        description: "Borderline TSH warrants a repeat measurement together with anti-TPO antibodies.",
        priority: Priority::Low,
        category: RecommendationCategory::Diagnostic,
        evidence: EvidenceLevel::C,
        citations: &[ASRM_SUBCLINICAL_HYPOTHYROIDISM],
        applies: |v, _| v.profile().tsh.is_some_and(|tsh| (2.5..4.0).contains(&tsh)),
    },
    RecommendationRule {
        id: "hyperthyroid_workup",
        axis: Some(FactorAxis::Tsh),
        title: "Evaluate suppressed TSH",
        description: "A suppressed TSH requires free T4/T3 measurement to exclude hyperthyroidism.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Diagnostic,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |v, _| v.profile().tsh.is_some_and(|tsh| tsh < 0.4),
    },
    RecommendationRule {
        id: "dopamine_agonist",
        axis: Some(FactorAxis::Prolactin),
        title: "Treat hyperprolactinemia",
        description: "Confirm the elevation, exclude macroprolactin and consider cabergoline.",
        priority: Priority::High,
        category: RecommendationCategory::Pharmacological,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |_, f| below_neutral(f, FactorAxis::Prolactin),
    },
    RecommendationRule {
        id: "insulin_sensitizer",
        axis: Some(FactorAxis::HomaIr),
        title: "Address insulin resistance",
        description: "Lifestyle intervention, with metformin when HOMA-IR remains elevated.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Pharmacological,
        evidence: EvidenceLevel::B,
        citations: &[PCOS_GUIDELINE],
        applies: |v, _| v.profile().homa_ir.is_some_and(|h| h >= 2.5),
    },
    RecommendationRule {
        id: "letrozole_ovulation_induction",
        axis: Some(FactorAxis::Pcos),
        title: "Ovulation induction with letrozole",
        description: "Letrozole is first-line pharmacological treatment for anovulatory PCOS.",
        priority: Priority::High,
        category: RecommendationCategory::Pharmacological,
        evidence: EvidenceLevel::A,
        citations: &[LETROZOLE_TRIAL, PCOS_GUIDELINE],
        applies: |_, f| below_neutral(f, FactorAxis::Pcos),
    },
    RecommendationRule {
        id: "ovulation_confirmation",
        axis: Some(FactorAxis::Cycle),
        title: "Confirm ovulation",
        description: "Irregular cycles call for mid-luteal progesterone or ultrasound follicle tracking.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Diagnostic,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |_, f| below_neutral(f, FactorAxis::Cycle),
    },
    RecommendationRule {
        id: "complete_workup_duration",
        axis: Some(FactorAxis::InfertilityDuration),
        title: "Complete infertility work-up",
        description: "Two or more years of infertility warrant tubal, uterine and semen assessment if not yet done.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Diagnostic,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |v, _| v.profile().infertility_duration_years.is_some_and(|y| y >= 2.0),
    },
    RecommendationRule {
        id: "advanced_endometriosis_art",
        axis: Some(FactorAxis::Endometriosis),
        title: "Assisted reproduction for advanced endometriosis",
        description: "In stage III-IV disease, IVF is preferred over repeat surgery when fertility is the goal.",
        priority: Priority::High,
        category: RecommendationCategory::Reproductive,
        evidence: EvidenceLevel::B,
        citations: &[ESHRE_ENDOMETRIOSIS],
        applies: |v, _| {
            v.profile()
                .endometriosis_stage
                .is_some_and(|s| s >= EndometriosisStage::Moderate)
        },
    },
    RecommendationRule {
        id: "laparoscopic_excision",
        axis: Some(FactorAxis::Endometriosis),
        title: "Operative laparoscopy for early endometriosis",
        description: "Excision or ablation of stage I-II lesions improves spontaneous pregnancy rates.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Surgical,
        evidence: EvidenceLevel::B,
        citations: &[ESHRE_ENDOMETRIOSIS],
        applies: |v, _| {
            matches!(
                v.profile().endometriosis_stage,
                Some(EndometriosisStage::Minimal | EndometriosisStage::Mild)
            )
        },
    },
    RecommendationRule {
        id: "hysteroscopic_myomectomy",
        axis: Some(FactorAxis::Myoma),
        title: "Hysteroscopic myomectomy",
        description: "Submucosal myomas distort the cavity and should be resected before treatment.",
        priority: Priority::High,
        category: RecommendationCategory::Surgical,
        evidence: EvidenceLevel::A,
        citations: &[FIBROID_REVIEW],
        applies: |v, _| v.profile().myoma_type == Some(MyomaType::Submucosal),
    },
    RecommendationRule {
        id: "intramural_myoma_assessment",
        axis: Some(FactorAxis::Myoma),
        title: "Surgical assessment of intramural myoma",
        description: "Intramural myomas of 4 cm or more may warrant myomectomy before IVF.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Surgical,
        evidence: EvidenceLevel::C,
        citations: &[FIBROID_REVIEW],
        applies: |v, _| {
            let profile = v.profile();
            profile.myoma_type == Some(MyomaType::Intramural)
                && profile.myoma_size_cm.is_some_and(|size| size >= 4.0)
        },
    },
    RecommendationRule {
        id: "hysteroscopic_polypectomy",
        axis: Some(FactorAxis::Polyp),
        title: "Hysteroscopic polypectomy",
        description: "Removing endometrial polyps improves pregnancy rates with IUI.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Surgical,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |v, _| matches!(v.profile().polyp, Some(PolypType::Single | PolypType::Multiple)),
    },
    RecommendationRule {
        id: "adenomyosis_downregulation",
        axis: Some(FactorAxis::Adenomyosis),
        title: "GnRH agonist pretreatment",
        description: "Down-regulation before frozen embryo transfer may improve implantation in adenomyosis.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Pharmacological,
        evidence: EvidenceLevel::C,
        citations: &[],
        applies: |v, _| matches!(v.profile().adenomyosis, Some(kind) if kind != AdenomyosisType::None),
    },
    RecommendationRule {
        id: "unilateral_tubal_iui",
        axis: Some(FactorAxis::Hsg),
        title: "IUI with unilateral tubal patency",
        description: "With one patent tube, stimulated IUI remains a reasonable first-line option.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Reproductive,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |v, _| v.profile().tubal_patency == Some(TubalPatency::UnilateralObstruction),
    },
    RecommendationRule {
        id: "bilateral_tubal_ivf",
        axis: Some(FactorAxis::Otb),
        title: "Proceed to IVF",
        description: "Bilateral tubal occlusion precludes natural conception and IUI.",
        priority: Priority::Critical,
        category: RecommendationCategory::Reproductive,
        evidence: EvidenceLevel::A,
        citations: &[ASRM_FERTILITY_EVALUATION],
        applies: |v, _| v.profile().bilateral_occlusion(),
    },
    RecommendationRule {
        id: "ovarian_reserve_after_surgery",
        axis: Some(FactorAxis::PelvicSurgery),
        title: "Assess ovarian reserve after pelvic surgery",
        description: "Repeated pelvic surgery can reduce ovarian reserve and cause adhesions.",
        priority: Priority::Low,
        category: RecommendationCategory::Diagnostic,
        evidence: EvidenceLevel::C,
        citations: &[ASRM_OVARIAN_RESERVE],
        applies: |v, _| v.profile().pelvic_surgery_count.is_some_and(|n| n >= 2),
    },
    RecommendationRule {
        id: "azoospermia_genetics",
        axis: Some(FactorAxis::Male),
        title: "Genetic work-up for azoospermia",
        description: "Karyotype and Y-chromosome microdeletion testing before sperm retrieval.",
        priority: Priority::Critical,
        category: RecommendationCategory::Genetic,
        evidence: EvidenceLevel::A,
        citations: &[AUA_ASRM_MALE_INFERTILITY],
        applies: |v, _| male_severity(v) == Some(MaleSeverity::Azoospermia),
    },
    RecommendationRule {
        id: "icsi_male_factor",
        axis: Some(FactorAxis::Male),
        title: "IVF with ICSI",
        description: "Moderate to severe semen alterations are best addressed with intracytoplasmic sperm injection.",
        priority: Priority::High,
        category: RecommendationCategory::Reproductive,
        evidence: EvidenceLevel::A,
        citations: &[WHO_SEMEN_MANUAL, AUA_ASRM_MALE_INFERTILITY],
        applies: |v, _| {
            matches!(
                male_severity(v),
                Some(MaleSeverity::Moderate | MaleSeverity::Severe)
            )
        },
    },
    RecommendationRule {
        id: "male_lifestyle",
        axis: Some(FactorAxis::Male),
        title: "Male lifestyle optimization",
        description: "Stop smoking, limit alcohol and heat exposure, and repeat the semen analysis in 3 months.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Lifestyle,
        evidence: EvidenceLevel::B,
        citations: &[WHO_SEMEN_MANUAL],
        applies: |v, _| male_severity(v) == Some(MaleSeverity::Mild),
    },
    RecommendationRule {
        id: "dna_fragmentation_management",
        axis: Some(FactorAxis::Male),
        title: "Manage high sperm DNA fragmentation",
        description: "Antioxidant therapy, short abstinence intervals and testicular sperm for ICSI may reduce fragmentation.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Pharmacological,
        evidence: EvidenceLevel::C,
        citations: &[DNA_FRAGMENTATION_GUIDELINE],
        applies: |v, _| v.profile().semen.dna_fragmentation.is_some_and(|dfi| dfi >= 30.0),
    },
    RecommendationRule {
        id: "varicocelectomy",
        axis: Some(FactorAxis::Male),
        title: "Urology referral for varicocele",
        description: "Repair of a clinical varicocele can improve semen parameters.",
        priority: Priority::Moderate,
        category: RecommendationCategory::Surgical,
        evidence: EvidenceLevel::B,
        citations: &[AUA_ASRM_MALE_INFERTILITY],
        applies: |v, _| v.profile().semen.varicocele == Some(true),
    },
    RecommendationRule {
        id: "seminal_infection",
        axis: Some(FactorAxis::Male),
        title: "Treat seminal tract infection",
        description: "Culture-directed antibiotic treatment, then repeat the semen analysis.",
        priority: Priority::High,
        category: RecommendationCategory::Pharmacological,
        evidence: EvidenceLevel::B,
        citations: &[],
        applies: |v, _| v.profile().semen.seminal_culture_positive == Some(true),
    },
];

/// Evaluate every rule, rank by priority then evidence, keep at most `limit`.
pub fn recommend(
    validated: &ValidatedProfile,
    factors: &MedicalFactors,
    limit: usize,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = RECOMMENDATION_RULES
        .iter()
        .filter(|rule| (rule.applies)(validated, factors))
        .map(RecommendationRule::to_recommendation)
        .collect();

    // Stable sort keeps rule order for ties.
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.evidence.cmp(&b.evidence)));
    recommendations.truncate(limit);

    tracing::debug!(count = recommendations.len(), "Generated recommendations");
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::models::{ClinicalProfile, PcosPhenotype, SemenAnalysis};
    use crate::validation::validate;

    fn run(profile: &ClinicalProfile) -> Vec<Recommendation> {
        let validated = validate(profile).unwrap();
        let factors = aggregate(&validated);
        recommend(&validated, &factors, 50)
    }

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_rule_ids_unique() {
        let unique: std::collections::HashSet<_> = RECOMMENDATION_RULES.iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), RECOMMENDATION_RULES.len());
    }

    #[test]
    fn test_every_recommendation_has_citations() {
        for category in [
            RecommendationCategory::Pharmacological,
            RecommendationCategory::Surgical,
            RecommendationCategory::Lifestyle,
            RecommendationCategory::Diagnostic,
            RecommendationCategory::Reproductive,
            RecommendationCategory::Genetic,
        ] {
            assert!(!default_citations(category).is_empty());
        }
        let mut profile = ClinicalProfile::new(41.0);
        profile.prolactin = Some(60.0);
        profile.polyp = Some(PolypType::Single);
        for rec in run(&profile) {
            assert!(!rec.citations.is_empty(), "{} has no citations", rec.id);
        }
    }

    #[test]
    fn test_category_default_citations_used() {
        let mut profile = ClinicalProfile::new(30.0);
        profile.prolactin = Some(60.0);
        let recs = run(&profile);
        let rec = recs.iter().find(|r| r.id == "dopamine_agonist").unwrap();
        let expected: Vec<String> = default_citations(RecommendationCategory::Pharmacological)
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(rec.citations, expected);
    }

    #[test]
    fn test_optimal_profile_has_no_actionable_recommendations() {
        let mut profile = ClinicalProfile::new(30.0);
        profile.bmi = Some(22.0);
        profile.amh = Some(2.0);
        profile.tsh = Some(1.5);
        assert!(run(&profile).is_empty());
    }

    #[test]
    fn test_one_recommendation_per_finding() {
        let mut profile = ClinicalProfile::new(31.0);
        profile.has_pcos = Some(true);
        profile.pcos_phenotype = Some(PcosPhenotype::A);
        profile.homa_ir = Some(3.0);
        profile.amh = Some(5.0);
        let found = run(&profile);
        let found = ids(&found);
        assert!(found.contains(&"letrozole_ovulation_induction"));
        assert!(found.contains(&"insulin_sensitizer"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_single_age_recommendation_per_band() {
        let age_ids = |age: f64| -> Vec<String> {
            run(&ClinicalProfile::new(age))
                .into_iter()
                .filter(|r| r.axis == Some(FactorAxis::Age))
                .map(|r| r.id)
                .collect()
        };
        assert!(age_ids(30.0).is_empty());
        assert_eq!(age_ids(36.0), vec!["expedited_evaluation_age"]);
        assert_eq!(age_ids(40.0), vec!["immediate_evaluation_advanced_age"]);
        assert_eq!(age_ids(44.0), vec!["immediate_evaluation_advanced_age"]);

        let recs = run(&ClinicalProfile::new(42.0));
        let rec = recs
            .iter()
            .find(|r| r.id == "immediate_evaluation_advanced_age")
            .unwrap();
        assert!(rec.citations.iter().any(|c| c.contains("PGT")));
    }

    #[test]
    fn test_ranked_by_priority_then_evidence() {
        let mut profile = ClinicalProfile::new(38.0);
        profile.tubal_patency = Some(TubalPatency::BilateralObstruction);
        profile.tsh = Some(3.0);
        profile.bmi = Some(27.0);
        let recs = run(&profile);
        assert_eq!(recs[0].id, "bilateral_tubal_ivf");
        for pair in recs.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
            if pair[0].priority == pair[1].priority {
                assert!(pair[0].evidence <= pair[1].evidence);
            }
        }
    }

    #[test]
    fn test_male_factor_recommendations() {
        let mut profile = ClinicalProfile::new(33.0);
        profile.amh = Some(2.0);
        profile.semen = SemenAnalysis {
            concentration: Some(5.0),
            motility: Some(20.0),
            morphology: Some(2.0),
            varicocele: Some(true),
            ..SemenAnalysis::default()
        };
        let found = run(&profile);
        let found = ids(&found);
        assert!(found.contains(&"icsi_male_factor"));
        assert!(found.contains(&"varicocelectomy"));
        assert!(!found.contains(&"male_lifestyle"));
    }

    #[test]
    fn test_limit_truncates() {
        let mut profile = ClinicalProfile::new(42.0);
        profile.bmi = Some(33.0);
        profile.tsh = Some(6.0);
        profile.prolactin = Some(60.0);
        let validated = validate(&profile).unwrap();
        let factors = aggregate(&validated);
        assert_eq!(recommend(&validated, &factors, 2).len(), 2);
    }
}
