//! Factor calculators.
//!
//! Every continuous calculator is an ordered table of closed-open bands
//! evaluated by [`lookup`]. Tables run from -inf to +inf without gaps, so
//! any finite input matches exactly one band. The fallback passed to
//! [`lookup_or`] is only reached for NaN.

mod female;
mod male;
mod pathology;

pub use female::*;
pub use male::*;
pub use pathology::*;

use crate::models::FactorAxis;
use crate::validation::ClinicalField;

/// Value produced by a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandValue {
    Constant(f64),
    /// Linear interpolation from `from` at the lower bound to `to` at the upper bound
    Linear { from: f64, to: f64 },
}

/// A closed-open interval `[lower, upper)` mapped to a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    pub value: BandValue,
}

impl Band {
    pub const fn constant(lower: f64, upper: f64, value: f64) -> Self {
        Self {
            lower,
            upper,
            value: BandValue::Constant(value),
        }
    }

    pub const fn linear(lower: f64, upper: f64, from: f64, to: f64) -> Self {
        Self {
            lower,
            upper,
            value: BandValue::Linear { from, to },
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x < self.upper
    }

    /// Evaluate the band at `x` (assumed to be inside the band).
    pub fn value_at(&self, x: f64) -> f64 {
        match self.value {
            BandValue::Constant(v) => v,
            BandValue::Linear { from, to } => {
                let t = (x - self.lower) / (self.upper - self.lower);
                from + t * (to - from)
            }
        }
    }
}

/// Index of the band containing `x`.
pub fn band_index(table: &[Band], x: f64) -> Option<usize> {
    table.iter().position(|band| band.contains(x))
}

/// Evaluate a band table; `None` when no band contains `x`.
pub fn lookup(table: &[Band], x: f64) -> Option<f64> {
    band_index(table, x).map(|i| table[i].value_at(x))
}

/// Evaluate a band table, falling back to `fallback` outside every band.
///
/// The fallback guards against invariant violations (NaN input or a broken
/// table) and is logged when taken.
pub fn lookup_or(table: &[Band], x: f64, fallback: f64, calculator: &'static str) -> f64 {
    match lookup(table, x) {
        Some(value) => value,
        None => {
            tracing::warn!(calculator, input = x, fallback, "No band matched, using fallback");
            fallback
        }
    }
}

/// Check that a table covers (-inf, +inf) with contiguous, non-empty bands
/// and that linear bands have finite bounds.
pub fn is_well_formed(table: &[Band]) -> bool {
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return false;
    };
    if first.lower != f64::NEG_INFINITY || last.upper != f64::INFINITY {
        return false;
    }
    let contiguous = table.windows(2).all(|pair| pair[0].upper == pair[1].lower);
    let ordered = table.iter().all(|band| band.lower < band.upper);
    let finite_linear = table.iter().all(|band| match band.value {
        BandValue::Constant(_) => true,
        BandValue::Linear { .. } => band.lower.is_finite() && band.upper.is_finite(),
    });
    contiguous && ordered && finite_linear
}

/// A continuous calculator: the axis it feeds, its input field and table.
#[derive(Debug, Clone, Copy)]
pub struct BandCalculator {
    pub name: &'static str,
    pub axis: FactorAxis,
    pub field: ClinicalField,
    pub table: &'static [Band],
}

/// Every band-table calculator in the engine.
pub const BAND_CALCULATORS: [BandCalculator; 14] = [
    BandCalculator { name: "age", axis: FactorAxis::Age, field: ClinicalField::Age, table: AGE_BANDS },
    BandCalculator { name: "bmi", axis: FactorAxis::Bmi, field: ClinicalField::Bmi, table: BMI_BANDS },
    BandCalculator { name: "amh", axis: FactorAxis::Amh, field: ClinicalField::Amh, table: AMH_BANDS },
    BandCalculator { name: "tsh", axis: FactorAxis::Tsh, field: ClinicalField::Tsh, table: TSH_BANDS },
    BandCalculator { name: "prolactin", axis: FactorAxis::Prolactin, field: ClinicalField::Prolactin, table: PROLACTIN_BANDS },
    BandCalculator { name: "homa_ir", axis: FactorAxis::HomaIr, field: ClinicalField::HomaIr, table: HOMA_IR_BANDS },
    BandCalculator { name: "cycle", axis: FactorAxis::Cycle, field: ClinicalField::CycleLength, table: CYCLE_BANDS },
    BandCalculator {
        name: "infertility_duration",
        axis: FactorAxis::InfertilityDuration,
        field: ClinicalField::InfertilityDuration,
        table: DURATION_BANDS,
    },
    BandCalculator {
        name: "pelvic_surgery",
        axis: FactorAxis::PelvicSurgery,
        field: ClinicalField::PelvicSurgeryCount,
        table: PELVIC_SURGERY_BANDS,
    },
    BandCalculator { name: "parity", axis: FactorAxis::Parity, field: ClinicalField::Parity, table: PARITY_BANDS },
    BandCalculator {
        name: "dna_fragmentation",
        axis: FactorAxis::Male,
        field: ClinicalField::DnaFragmentation,
        table: DNA_FRAGMENTATION_BANDS,
    },
    BandCalculator {
        name: "submucosal_myoma",
        axis: FactorAxis::Myoma,
        field: ClinicalField::MyomaSize,
        table: SUBMUCOSAL_MYOMA_BANDS,
    },
    BandCalculator {
        name: "intramural_myoma",
        axis: FactorAxis::Myoma,
        field: ClinicalField::MyomaSize,
        table: INTRAMURAL_MYOMA_BANDS,
    },
    BandCalculator {
        name: "subserosal_myoma",
        axis: FactorAxis::Myoma,
        field: ClinicalField::MyomaSize,
        table: SUBSEROSAL_MYOMA_BANDS,
    },
];
