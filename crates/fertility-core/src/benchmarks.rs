//! Static subgroup benchmark tables.
//!
//! Reference data only: attached to results for context and used to
//! cross-check the synthesized monthly probability against the age-band
//! population value. None of it feeds the probability itself.

use serde::{Deserialize, Serialize};

use crate::models::{EndometriosisStage, PcosPhenotype};
use crate::validation::{MedicalValidationError, ValidatedProfile};

const SART_SOURCE: &str = "SART National Summary Report; Dunson DB et al. Hum Reprod 2002;17:1399-403.";
const PCOS_SOURCE: &str = "Legro RS et al. N Engl J Med 2014;371:119-29.";
const RESERVE_SOURCE: &str = "La Marca A et al. Hum Reprod Update 2014;20:124-40.";
const BMI_SOURCE: &str = "Practice Committee of the ASRM. Fertil Steril 2021;116:1266-85.";
const ENDOMETRIOSIS_SOURCE: &str = "Practice Committee of the ASRM. Fertil Steril 2012;98:591-98.";

/// Which table a reference came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BenchmarkTable {
    AgeBand,
    PcosPhenotype,
    OvarianReserve,
    BmiBand,
    EndometriosisStage,
}

/// One subgroup value attached to a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkReference {
    pub table: BenchmarkTable,
    pub subgroup: String,
    pub metric: String,
    pub value: f64,
    pub source: String,
}

/// Age band outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeBenchmark {
    pub lower: f64,
    pub upper: f64,
    pub label: &'static str,
    /// Natural monthly fecundability
    pub monthly_fecundability: f64,
    /// Live birth rate per IVF cycle
    pub ivf_live_birth_rate: f64,
}

pub const AGE_BENCHMARKS: &[AgeBenchmark] = &[
    AgeBenchmark { lower: f64::NEG_INFINITY, upper: 25.0, label: "under 25", monthly_fecundability: 0.25, ivf_live_birth_rate: 0.50 },
    AgeBenchmark { lower: 25.0, upper: 30.0, label: "25-29", monthly_fecundability: 0.22, ivf_live_birth_rate: 0.48 },
    AgeBenchmark { lower: 30.0, upper: 35.0, label: "30-34", monthly_fecundability: 0.18, ivf_live_birth_rate: 0.44 },
    AgeBenchmark { lower: 35.0, upper: 38.0, label: "35-37", monthly_fecundability: 0.13, ivf_live_birth_rate: 0.33 },
    AgeBenchmark { lower: 38.0, upper: 40.0, label: "38-39", monthly_fecundability: 0.09, ivf_live_birth_rate: 0.22 },
    AgeBenchmark { lower: 40.0, upper: 43.0, label: "40-42", monthly_fecundability: 0.05, ivf_live_birth_rate: 0.12 },
    AgeBenchmark { lower: 43.0, upper: f64::INFINITY, label: "43 and over", monthly_fecundability: 0.02, ivf_live_birth_rate: 0.04 },
];

/// Ovulation rate with letrozole per Rotterdam phenotype.
pub fn pcos_ovulation_rate(phenotype: PcosPhenotype) -> f64 {
    match phenotype {
        PcosPhenotype::A => 0.60,
        PcosPhenotype::B => 0.62,
        PcosPhenotype::C => 0.75,
        PcosPhenotype::D => 0.78,
    }
}

/// AMH band and expected oocyte yield after stimulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReserveBenchmark {
    pub lower: f64,
    pub upper: f64,
    pub label: &'static str,
    pub expected_oocytes: f64,
}

pub const RESERVE_BENCHMARKS: &[ReserveBenchmark] = &[
    ReserveBenchmark { lower: f64::NEG_INFINITY, upper: 0.5, label: "very low reserve", expected_oocytes: 3.0 },
    ReserveBenchmark { lower: 0.5, upper: 1.0, label: "low reserve", expected_oocytes: 5.0 },
    ReserveBenchmark { lower: 1.0, upper: 3.5, label: "normal reserve", expected_oocytes: 10.0 },
    ReserveBenchmark { lower: 3.5, upper: f64::INFINITY, label: "high reserve", expected_oocytes: 15.0 },
];

/// BMI band and fecundability relative to normal weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiBenchmark {
    pub lower: f64,
    pub upper: f64,
    pub label: &'static str,
    pub relative_fecundability: f64,
}

pub const BMI_BENCHMARKS: &[BmiBenchmark] = &[
    BmiBenchmark { lower: f64::NEG_INFINITY, upper: 18.5, label: "underweight", relative_fecundability: 0.85 },
    BmiBenchmark { lower: 18.5, upper: 25.0, label: "normal weight", relative_fecundability: 1.0 },
    BmiBenchmark { lower: 25.0, upper: 30.0, label: "overweight", relative_fecundability: 0.92 },
    BmiBenchmark { lower: 30.0, upper: 35.0, label: "obesity class I", relative_fecundability: 0.80 },
    BmiBenchmark { lower: 35.0, upper: 40.0, label: "obesity class II", relative_fecundability: 0.70 },
    BmiBenchmark { lower: 40.0, upper: f64::INFINITY, label: "obesity class III", relative_fecundability: 0.55 },
];

/// Monthly fecundability by rASRM stage.
pub fn endometriosis_fecundability(stage: EndometriosisStage) -> f64 {
    match stage {
        EndometriosisStage::None => 0.20,
        EndometriosisStage::Minimal => 0.10,
        EndometriosisStage::Mild => 0.08,
        EndometriosisStage::Moderate => 0.05,
        EndometriosisStage::Severe => 0.03,
    }
}

pub fn age_benchmark(age: f64) -> Option<&'static AgeBenchmark> {
    AGE_BENCHMARKS.iter().find(|b| age >= b.lower && age < b.upper)
}

pub fn reserve_benchmark(amh: f64) -> Option<&'static ReserveBenchmark> {
    RESERVE_BENCHMARKS.iter().find(|b| amh >= b.lower && amh < b.upper)
}

pub fn bmi_benchmark(bmi: f64) -> Option<&'static BmiBenchmark> {
    BMI_BENCHMARKS.iter().find(|b| bmi >= b.lower && bmi < b.upper)
}

fn reference(table: BenchmarkTable, subgroup: &str, metric: &str, value: f64, source: &str) -> BenchmarkReference {
    BenchmarkReference {
        table,
        subgroup: subgroup.to_string(),
        metric: metric.to_string(),
        value,
        source: source.to_string(),
    }
}

/// References for every subgroup the profile belongs to.
pub fn references_for(validated: &ValidatedProfile) -> Vec<BenchmarkReference> {
    let profile = validated.profile();
    let mut references = Vec::new();

    if let Some(band) = age_benchmark(validated.age()) {
        references.push(reference(
            BenchmarkTable::AgeBand,
            band.label,
            "monthly fecundability",
            band.monthly_fecundability,
            SART_SOURCE,
        ));
        references.push(reference(
            BenchmarkTable::AgeBand,
            band.label,
            "IVF live birth rate per cycle",
            band.ivf_live_birth_rate,
            SART_SOURCE,
        ));
    }
    if let Some(phenotype) = profile.pcos_phenotype.filter(|_| profile.pcos_present()) {
        references.push(reference(
            BenchmarkTable::PcosPhenotype,
            &format!("PCOS phenotype {}", phenotype),
            "ovulation rate with letrozole",
            pcos_ovulation_rate(phenotype),
            PCOS_SOURCE,
        ));
    }
    if let Some(band) = profile.amh.and_then(reserve_benchmark) {
        references.push(reference(
            BenchmarkTable::OvarianReserve,
            band.label,
            "expected oocytes per stimulation",
            band.expected_oocytes,
            RESERVE_SOURCE,
        ));
    }
    if let Some(band) = validated.bmi().and_then(bmi_benchmark) {
        references.push(reference(
            BenchmarkTable::BmiBand,
            band.label,
            "relative fecundability",
            band.relative_fecundability,
            BMI_SOURCE,
        ));
    }
    if let Some(stage) = profile.endometriosis_stage {
        references.push(reference(
            BenchmarkTable::EndometriosisStage,
            &format!("endometriosis stage {}", stage.stage()),
            "monthly fecundability",
            endometriosis_fecundability(stage),
            ENDOMETRIOSIS_SOURCE,
        ));
    }
    references
}

/// Flag a monthly estimate more than `tolerance` times the age-band value.
pub fn check_plausibility(age: f64, monthly: f64, tolerance: f64) -> Option<MedicalValidationError> {
    let band = age_benchmark(age)?;
    let expected = band.monthly_fecundability;
    (monthly > expected * tolerance).then(|| {
        tracing::warn!(
            subgroup = band.label,
            monthly,
            expected,
            "Monthly probability exceeds age-band benchmark"
        );
        MedicalValidationError::BenchmarkDeviation {
            subgroup: format!("age {}", band.label),
            monthly,
            expected,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClinicalProfile;
    use crate::validation::validate;

    fn contiguous(bounds: &[(f64, f64)]) -> bool {
        bounds.first().is_some_and(|b| b.0 == f64::NEG_INFINITY)
            && bounds.last().is_some_and(|b| b.1 == f64::INFINITY)
            && bounds.windows(2).all(|w| w[0].1 == w[1].0)
    }

    #[test]
    fn test_tables_are_contiguous() {
        assert!(contiguous(&AGE_BENCHMARKS.iter().map(|b| (b.lower, b.upper)).collect::<Vec<_>>()));
        assert!(contiguous(&RESERVE_BENCHMARKS.iter().map(|b| (b.lower, b.upper)).collect::<Vec<_>>()));
        assert!(contiguous(&BMI_BENCHMARKS.iter().map(|b| (b.lower, b.upper)).collect::<Vec<_>>()));
    }

    #[test]
    fn test_age_benchmark_lookup() {
        assert_eq!(age_benchmark(28.0).unwrap().label, "25-29");
        assert_eq!(age_benchmark(35.0).unwrap().label, "35-37");
        assert_eq!(age_benchmark(50.0).unwrap().label, "43 and over");
        assert!(age_benchmark(f64::NAN).is_none());
    }

    #[test]
    fn test_age_benchmarks_decline() {
        for pair in AGE_BENCHMARKS.windows(2) {
            assert!(pair[0].monthly_fecundability > pair[1].monthly_fecundability);
            assert!(pair[0].ivf_live_birth_rate > pair[1].ivf_live_birth_rate);
        }
    }

    #[test]
    fn test_references_for_age_only() {
        let refs = references_for(&validate(&ClinicalProfile::new(28.0)).unwrap());
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.table == BenchmarkTable::AgeBand));
    }

    #[test]
    fn test_references_for_full_profile() {
        let mut profile = ClinicalProfile::new(33.0);
        profile.amh = Some(0.7);
        profile.bmi = Some(31.0);
        profile.has_pcos = Some(true);
        profile.pcos_phenotype = Some(PcosPhenotype::C);
        profile.endometriosis_stage = Some(EndometriosisStage::Mild);

        let refs = references_for(&validate(&profile).unwrap());
        let tables: Vec<_> = refs.iter().map(|r| r.table).collect();
        assert!(tables.contains(&BenchmarkTable::PcosPhenotype));
        assert!(tables.contains(&BenchmarkTable::OvarianReserve));
        assert!(tables.contains(&BenchmarkTable::BmiBand));
        assert!(tables.contains(&BenchmarkTable::EndometriosisStage));

        let reserve = refs.iter().find(|r| r.table == BenchmarkTable::OvarianReserve).unwrap();
        assert_eq!(reserve.subgroup, "low reserve");
        assert_eq!(reserve.value, 5.0);
    }

    #[test]
    fn test_plausibility_only_flags_optimistic_estimates() {
        assert!(check_plausibility(28.0, 0.209, 2.0).is_none());
        assert!(check_plausibility(41.0, 0.005, 2.0).is_none());

        let warning = check_plausibility(41.0, 0.15, 2.0).unwrap();
        assert!(matches!(
            warning,
            MedicalValidationError::BenchmarkDeviation { expected, .. } if (expected - 0.05).abs() < 1e-12
        ));
    }
}
