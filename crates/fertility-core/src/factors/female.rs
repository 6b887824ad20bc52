//! Female factor calculators.

use super::{lookup_or, Band};
use crate::models::PcosPhenotype;

const NEG: f64 = f64::NEG_INFINITY;
const POS: f64 = f64::INFINITY;

/// Age (years) → monthly fecundability.
///
/// Flat at the population maximum before 22, piecewise linear and
/// non-increasing through 45, then flat at the 0.005 floor.
pub const AGE_BANDS: &[Band] = &[
    Band::constant(NEG, 22.0, 0.25),
    Band::linear(22.0, 25.0, 0.25, 0.23),
    Band::linear(25.0, 30.0, 0.23, 0.195),
    Band::linear(30.0, 35.0, 0.195, 0.15),
    Band::linear(35.0, 38.0, 0.15, 0.09),
    Band::linear(38.0, 40.0, 0.09, 0.06),
    Band::linear(40.0, 42.0, 0.06, 0.035),
    Band::linear(42.0, 45.0, 0.035, 0.005),
    Band::constant(45.0, POS, 0.005),
];

/// BMI (kg/m²); optimal at 20-25.
pub const BMI_BANDS: &[Band] = &[
    Band::constant(NEG, 17.0, 0.75),
    Band::constant(17.0, 18.5, 0.85),
    Band::constant(18.5, 20.0, 0.95),
    Band::constant(20.0, 25.0, 1.0),
    Band::constant(25.0, 30.0, 0.92),
    Band::constant(30.0, 35.0, 0.80),
    Band::constant(35.0, 40.0, 0.70),
    Band::constant(40.0, POS, 0.55),
];

/// AMH (ng/mL). Very high values suggest PCOS and score slightly lower.
pub const AMH_BANDS: &[Band] = &[
    Band::constant(NEG, 0.5, 0.40),
    Band::constant(0.5, 1.0, 0.65),
    Band::constant(1.0, 1.5, 0.85),
    Band::constant(1.5, 4.0, 1.0),
    Band::constant(4.0, 6.0, 0.95),
    Band::constant(6.0, POS, 0.85),
];

/// TSH (mIU/L); preconception target below 2.5.
pub const TSH_BANDS: &[Band] = &[
    Band::constant(NEG, 0.4, 0.85),
    Band::constant(0.4, 2.5, 1.0),
    Band::constant(2.5, 4.0, 0.92),
    Band::constant(4.0, 10.0, 0.75),
    Band::constant(10.0, POS, 0.50),
];

/// Prolactin (ng/mL).
pub const PROLACTIN_BANDS: &[Band] = &[
    Band::constant(NEG, 25.0, 1.0),
    Band::constant(25.0, 50.0, 0.85),
    Band::constant(50.0, 100.0, 0.65),
    Band::constant(100.0, POS, 0.40),
];

/// HOMA-IR.
pub const HOMA_IR_BANDS: &[Band] = &[
    Band::constant(NEG, 2.0, 1.0),
    Band::constant(2.0, 2.5, 0.95),
    Band::constant(2.5, 3.5, 0.85),
    Band::constant(3.5, 5.0, 0.75),
    Band::constant(5.0, POS, 0.65),
];

/// Cycle length (days); eumenorrhea at 26-33.
pub const CYCLE_BANDS: &[Band] = &[
    Band::constant(NEG, 21.0, 0.80),
    Band::constant(21.0, 26.0, 0.95),
    Band::constant(26.0, 33.0, 1.0),
    Band::constant(33.0, 36.0, 0.92),
    Band::constant(36.0, 45.0, 0.80),
    Band::constant(45.0, POS, 0.60),
];

/// Time trying to conceive (years).
pub const DURATION_BANDS: &[Band] = &[
    Band::constant(NEG, 1.0, 1.0),
    Band::constant(1.0, 2.0, 0.95),
    Band::constant(2.0, 3.0, 0.85),
    Band::constant(3.0, 5.0, 0.75),
    Band::constant(5.0, POS, 0.60),
];

/// Previous pelvic surgeries (count).
pub const PELVIC_SURGERY_BANDS: &[Band] = &[
    Band::constant(NEG, 1.0, 1.0),
    Band::constant(1.0, 2.0, 0.90),
    Band::constant(2.0, 3.0, 0.80),
    Band::constant(3.0, POS, 0.70),
];

/// Previous pregnancies (count); proven fertility is a mild positive.
pub const PARITY_BANDS: &[Band] = &[
    Band::constant(NEG, 1.0, 1.0),
    Band::constant(1.0, POS, 1.05),
];

/// Monthly fecundability for a female age.
pub fn age_factor(age: f64) -> f64 {
    lookup_or(AGE_BANDS, age, 0.005, "age")
}

pub fn bmi_factor(bmi: f64) -> f64 {
    lookup_or(BMI_BANDS, bmi, 0.55, "bmi")
}

pub fn amh_factor(amh: f64) -> f64 {
    lookup_or(AMH_BANDS, amh, 0.40, "amh")
}

pub fn tsh_factor(tsh: f64) -> f64 {
    lookup_or(TSH_BANDS, tsh, 0.50, "tsh")
}

pub fn prolactin_factor(prolactin: f64) -> f64 {
    lookup_or(PROLACTIN_BANDS, prolactin, 0.40, "prolactin")
}

pub fn homa_ir_factor(homa_ir: f64) -> f64 {
    lookup_or(HOMA_IR_BANDS, homa_ir, 0.65, "homa_ir")
}

pub fn cycle_factor(cycle_length_days: f64) -> f64 {
    lookup_or(CYCLE_BANDS, cycle_length_days, 0.60, "cycle")
}

pub fn infertility_duration_factor(years: f64) -> f64 {
    lookup_or(DURATION_BANDS, years, 0.60, "infertility_duration")
}

pub fn pelvic_surgery_factor(count: u32) -> f64 {
    lookup_or(PELVIC_SURGERY_BANDS, f64::from(count), 0.70, "pelvic_surgery")
}

pub fn parity_factor(pregnancies: u32) -> f64 {
    lookup_or(PARITY_BANDS, f64::from(pregnancies), 1.0, "parity")
}

/// PCOS multiplier by Rotterdam phenotype.
///
/// Phenotypes with ovulatory dysfunction (A, B) carry the largest penalty.
/// A confirmed diagnosis without a phenotype uses the pooled value.
pub fn pcos_factor(phenotype: Option<PcosPhenotype>) -> f64 {
    match phenotype {
        Some(PcosPhenotype::A) => 0.70,
        Some(PcosPhenotype::B) => 0.72,
        Some(PcosPhenotype::C) => 0.85,
        Some(PcosPhenotype::D) => 0.88,
        None => 0.75,
    }
}
