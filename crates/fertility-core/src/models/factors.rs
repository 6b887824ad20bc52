//! Per-axis factor multipliers.

use serde::{Deserialize, Serialize};

/// One clinical axis of the multiplicative model.
///
/// The declaration order is the order in which the synthesizer multiplies
/// factors, so results are reproducible bit for bit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FactorAxis {
    Age,
    Bmi,
    Cycle,
    InfertilityDuration,
    Amh,
    Tsh,
    Prolactin,
    #[serde(rename = "homaIR")]
    HomaIr,
    Parity,
    Pcos,
    Endometriosis,
    Myoma,
    Polyp,
    Adenomyosis,
    Hsg,
    Otb,
    PelvicSurgery,
    Male,
}

/// Static metadata for a factor axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisInfo {
    pub axis: FactorAxis,
    /// Stable key used in serialized output
    pub key: &'static str,
    /// Human readable label
    pub label: &'static str,
    /// Declared output range (inclusive)
    pub min: f64,
    pub max: f64,
}

const fn info(axis: FactorAxis, key: &'static str, label: &'static str, min: f64, max: f64) -> AxisInfo {
    AxisInfo {
        axis,
        key,
        label,
        min,
        max,
    }
}

/// Axis metadata, indexed in declaration order.
pub const AXIS_TABLE: [AxisInfo; 18] = [
    info(FactorAxis::Age, "age", "Female age", 0.005, 0.25),
    info(FactorAxis::Bmi, "bmi", "Body mass index", 0.0, 1.0),
    info(FactorAxis::Cycle, "cycle", "Cycle regularity", 0.0, 1.0),
    info(FactorAxis::InfertilityDuration, "infertilityDuration", "Infertility duration", 0.0, 1.0),
    info(FactorAxis::Amh, "amh", "Ovarian reserve (AMH)", 0.0, 1.0),
    info(FactorAxis::Tsh, "tsh", "Thyroid function (TSH)", 0.0, 1.0),
    info(FactorAxis::Prolactin, "prolactin", "Prolactin", 0.0, 1.0),
    info(FactorAxis::HomaIr, "homaIR", "Insulin resistance (HOMA-IR)", 0.0, 1.0),
    info(FactorAxis::Parity, "parity", "Previous pregnancies", 0.0, 1.05),
    info(FactorAxis::Pcos, "pcos", "Polycystic ovary syndrome", 0.0, 1.0),
    info(FactorAxis::Endometriosis, "endometriosis", "Endometriosis", 0.0, 1.0),
    info(FactorAxis::Myoma, "myoma", "Uterine myoma", 0.0, 1.0),
    info(FactorAxis::Polyp, "polyp", "Endometrial polyps", 0.0, 1.0),
    info(FactorAxis::Adenomyosis, "adenomyosis", "Adenomyosis", 0.0, 1.0),
    info(FactorAxis::Hsg, "hsg", "Tubal patency (HSG)", 0.0, 1.0),
    info(FactorAxis::Otb, "otb", "Bilateral tubal occlusion", 0.0, 1.0),
    info(FactorAxis::PelvicSurgery, "pelvicSurgery", "Previous pelvic surgery", 0.0, 1.0),
    info(FactorAxis::Male, "male", "Male factor", 0.0, 1.0),
];

impl FactorAxis {
    /// All axes in multiplication order.
    pub const ALL: [FactorAxis; 18] = [
        FactorAxis::Age,
        FactorAxis::Bmi,
        FactorAxis::Cycle,
        FactorAxis::InfertilityDuration,
        FactorAxis::Amh,
        FactorAxis::Tsh,
        FactorAxis::Prolactin,
        FactorAxis::HomaIr,
        FactorAxis::Parity,
        FactorAxis::Pcos,
        FactorAxis::Endometriosis,
        FactorAxis::Myoma,
        FactorAxis::Polyp,
        FactorAxis::Adenomyosis,
        FactorAxis::Hsg,
        FactorAxis::Otb,
        FactorAxis::PelvicSurgery,
        FactorAxis::Male,
    ];

    /// Static metadata for this axis.
    pub fn info(self) -> &'static AxisInfo {
        &AXIS_TABLE[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Whether a value lies inside the declared output range.
    pub fn accepts(self, value: f64) -> bool {
        let info = self.info();
        value.is_finite() && value >= info.min && value <= info.max
    }
}

/// Multipliers for every clinical axis of one computation.
///
/// `age` holds a monthly fecundability; every other axis is a dimensionless
/// multiplier where 1.0 means "no effect".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFactors {
    pub age: f64,
    pub bmi: f64,
    pub cycle: f64,
    pub infertility_duration: f64,
    pub amh: f64,
    pub tsh: f64,
    pub prolactin: f64,
    #[serde(rename = "homaIR")]
    pub homa_ir: f64,
    pub parity: f64,
    pub pcos: f64,
    pub endometriosis: f64,
    pub myoma: f64,
    pub polyp: f64,
    pub adenomyosis: f64,
    pub hsg: f64,
    pub otb: f64,
    pub pelvic_surgery: f64,
    pub male: f64,
}

/// Multiplier used for an axis whose input is absent.
pub const NEUTRAL: f64 = 1.0;

impl MedicalFactors {
    /// All non-age axes neutral.
    pub fn neutral(age_fecundability: f64) -> Self {
        Self {
            age: age_fecundability,
            bmi: NEUTRAL,
            cycle: NEUTRAL,
            infertility_duration: NEUTRAL,
            amh: NEUTRAL,
            tsh: NEUTRAL,
            prolactin: NEUTRAL,
            homa_ir: NEUTRAL,
            parity: NEUTRAL,
            pcos: NEUTRAL,
            endometriosis: NEUTRAL,
            myoma: NEUTRAL,
            polyp: NEUTRAL,
            adenomyosis: NEUTRAL,
            hsg: NEUTRAL,
            otb: NEUTRAL,
            pelvic_surgery: NEUTRAL,
            male: NEUTRAL,
        }
    }

    /// Get the value for an axis.
    pub fn get(&self, axis: FactorAxis) -> f64 {
        match axis {
            FactorAxis::Age => self.age,
            FactorAxis::Bmi => self.bmi,
            FactorAxis::Cycle => self.cycle,
            FactorAxis::InfertilityDuration => self.infertility_duration,
            FactorAxis::Amh => self.amh,
            FactorAxis::Tsh => self.tsh,
            FactorAxis::Prolactin => self.prolactin,
            FactorAxis::HomaIr => self.homa_ir,
            FactorAxis::Parity => self.parity,
            FactorAxis::Pcos => self.pcos,
            FactorAxis::Endometriosis => self.endometriosis,
            FactorAxis::Myoma => self.myoma,
            FactorAxis::Polyp => self.polyp,
            FactorAxis::Adenomyosis => self.adenomyosis,
            FactorAxis::Hsg => self.hsg,
            FactorAxis::Otb => self.otb,
            FactorAxis::PelvicSurgery => self.pelvic_surgery,
            FactorAxis::Male => self.male,
        }
    }

    /// Iterate over `(axis, value)` pairs in multiplication order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorAxis, f64)> + '_ {
        FactorAxis::ALL.iter().map(move |&axis| (axis, self.get(axis)))
    }

    /// Axes other than age whose multiplier differs from neutral.
    pub fn non_neutral(&self) -> impl Iterator<Item = (FactorAxis, f64)> + '_ {
        self.iter()
            .filter(|(axis, value)| *axis != FactorAxis::Age && (*value - NEUTRAL).abs() > f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_table_matches_declaration_order() {
        for (index, axis) in FactorAxis::ALL.iter().enumerate() {
            assert_eq!(AXIS_TABLE[index].axis, *axis);
            assert_eq!(*axis as usize, index);
        }
    }

    #[test]
    fn test_axis_keys_unique() {
        let keys: std::collections::HashSet<_> = AXIS_TABLE.iter().map(|i| i.key).collect();
        assert_eq!(keys.len(), AXIS_TABLE.len());
    }

    #[test]
    fn test_accepts_declared_range() {
        assert!(FactorAxis::Age.accepts(0.25));
        assert!(!FactorAxis::Age.accepts(0.3));
        assert!(FactorAxis::Parity.accepts(1.05));
        assert!(!FactorAxis::Bmi.accepts(1.05));
        assert!(!FactorAxis::Male.accepts(f64::NAN));
    }

    #[test]
    fn test_neutral_factors() {
        let factors = MedicalFactors::neutral(0.2);
        assert_eq!(factors.get(FactorAxis::Age), 0.2);
        assert_eq!(factors.non_neutral().count(), 0);
        assert_eq!(factors.iter().count(), 18);
    }

    #[test]
    fn test_serialized_keys_match_axis_keys() {
        let json = serde_json::to_value(MedicalFactors::neutral(0.2)).unwrap();
        for axis in FactorAxis::ALL {
            assert!(json.get(axis.key()).is_some(), "missing key {}", axis.key());
            let axis_json = serde_json::to_value(axis).unwrap();
            assert_eq!(axis_json, serde_json::Value::String(axis.key().to_string()));
        }
    }
}
