//! Medically plausible input ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClinicalRange {
    pub min: f64,
    pub max: f64,
}

impl ClinicalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Closed-interval membership; NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A clinical input field of the profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClinicalField {
    Age,
    Height,
    Weight,
    Bmi,
    Amh,
    Tsh,
    Prolactin,
    HomaIr,
    CycleLength,
    InfertilityDuration,
    PelvicSurgeryCount,
    Parity,
    Pcos,
    Endometriosis,
    MyomaType,
    MyomaSize,
    Adenomyosis,
    Polyp,
    TubalPatency,
    BilateralTubalOcclusion,
    SpermConcentration,
    SpermMotility,
    SpermMorphology,
    DnaFragmentation,
    Varicocele,
    SeminalCulture,
}

impl ClinicalField {
    /// Fields reported in the availability analysis.
    ///
    /// Height and weight are folded into `Bmi`; the three semen parameters
    /// are reported individually.
    pub const REPORTED: [ClinicalField; 22] = [
        ClinicalField::Age,
        ClinicalField::Bmi,
        ClinicalField::Amh,
        ClinicalField::Tsh,
        ClinicalField::Prolactin,
        ClinicalField::HomaIr,
        ClinicalField::CycleLength,
        ClinicalField::InfertilityDuration,
        ClinicalField::PelvicSurgeryCount,
        ClinicalField::Parity,
        ClinicalField::Pcos,
        ClinicalField::Endometriosis,
        ClinicalField::MyomaType,
        ClinicalField::Adenomyosis,
        ClinicalField::Polyp,
        ClinicalField::TubalPatency,
        ClinicalField::SpermConcentration,
        ClinicalField::SpermMotility,
        ClinicalField::SpermMorphology,
        ClinicalField::DnaFragmentation,
        ClinicalField::Varicocele,
        ClinicalField::SeminalCulture,
    ];

    /// Valid range for numeric fields; `None` for categorical ones.
    pub fn range(self) -> Option<ClinicalRange> {
        let range = match self {
            Self::Age => ClinicalRange::new(18.0, 50.0),
            Self::Height => ClinicalRange::new(120.0, 220.0),
            Self::Weight => ClinicalRange::new(30.0, 250.0),
            Self::Bmi => ClinicalRange::new(15.0, 60.0),
            Self::Amh => ClinicalRange::new(0.1, 10.0),
            Self::Tsh => ClinicalRange::new(0.1, 20.0),
            Self::Prolactin => ClinicalRange::new(1.0, 200.0),
            Self::HomaIr => ClinicalRange::new(0.1, 20.0),
            Self::CycleLength => ClinicalRange::new(15.0, 90.0),
            Self::InfertilityDuration => ClinicalRange::new(0.0, 20.0),
            Self::PelvicSurgeryCount => ClinicalRange::new(0.0, 10.0),
            Self::Parity => ClinicalRange::new(0.0, 15.0),
            Self::MyomaSize => ClinicalRange::new(0.1, 20.0),
            Self::SpermConcentration => ClinicalRange::new(0.0, 300.0),
            Self::SpermMotility => ClinicalRange::new(0.0, 100.0),
            Self::SpermMorphology => ClinicalRange::new(0.0, 100.0),
            Self::DnaFragmentation => ClinicalRange::new(0.0, 100.0),
            Self::Pcos
            | Self::Endometriosis
            | Self::MyomaType
            | Self::Adenomyosis
            | Self::Polyp
            | Self::TubalPatency
            | Self::BilateralTubalOcclusion
            | Self::Varicocele
            | Self::SeminalCulture => return None,
        };
        Some(range)
    }

    /// Unit of measure for numeric fields.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Age | Self::InfertilityDuration => "years",
            Self::Height | Self::MyomaSize => "cm",
            Self::Weight => "kg",
            Self::Bmi => "kg/m²",
            Self::Amh | Self::Prolactin => "ng/mL",
            Self::Tsh => "mIU/L",
            Self::CycleLength => "days",
            Self::SpermConcentration => "million/mL",
            Self::SpermMotility | Self::SpermMorphology | Self::DnaFragmentation => "%",
            _ => "",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::Bmi => "BMI",
            Self::Amh => "AMH",
            Self::Tsh => "TSH",
            Self::Prolactin => "Prolactin",
            Self::HomaIr => "HOMA-IR",
            Self::CycleLength => "Cycle length",
            Self::InfertilityDuration => "Infertility duration",
            Self::PelvicSurgeryCount => "Pelvic surgeries",
            Self::Parity => "Parity",
            Self::Pcos => "PCOS",
            Self::Endometriosis => "Endometriosis",
            Self::MyomaType => "Myoma",
            Self::MyomaSize => "Myoma size",
            Self::Adenomyosis => "Adenomyosis",
            Self::Polyp => "Endometrial polyps",
            Self::TubalPatency => "Tubal patency",
            Self::BilateralTubalOcclusion => "Bilateral tubal occlusion",
            Self::SpermConcentration => "Sperm concentration",
            Self::SpermMotility => "Sperm motility",
            Self::SpermMorphology => "Sperm morphology",
            Self::DnaFragmentation => "DNA fragmentation",
            Self::Varicocele => "Varicocele",
            Self::SeminalCulture => "Seminal culture",
        }
    }
}

impl fmt::Display for ClinicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
