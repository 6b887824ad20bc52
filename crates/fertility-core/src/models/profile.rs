//! Clinical profile models.
//!
//! Every measurement except age is optional. Absence means "unknown" and is
//! never an error; the aggregator maps it to a neutral multiplier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a categorical label cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown {kind} label: {value}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Normalize a label for matching ("Sub-Mucosal " → "submucosal").
pub(crate) fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_lowercase()
}

/// Revised ASRM endometriosis stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EndometriosisStage {
    /// Stage 0: no disease found
    None,
    /// Stage I
    Minimal,
    /// Stage II
    Mild,
    /// Stage III
    Moderate,
    /// Stage IV
    Severe,
}

impl EndometriosisStage {
    /// Build from the numeric stage (0-4).
    pub fn from_stage(stage: u8) -> Option<Self> {
        match stage {
            0 => Some(Self::None),
            1 => Some(Self::Minimal),
            2 => Some(Self::Mild),
            3 => Some(Self::Moderate),
            4 => Some(Self::Severe),
            _ => None,
        }
    }

    /// Numeric stage (0-4).
    pub fn stage(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Minimal => 1,
            Self::Mild => 2,
            Self::Moderate => 3,
            Self::Severe => 4,
        }
    }
}

impl FromStr for EndometriosisStage {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = normalize_label(s);
        if let Ok(stage) = label.parse::<u8>() {
            return Self::from_stage(stage).ok_or_else(|| ParseLabelError::new("endometriosis stage", s));
        }
        match label.as_str() {
            "none" | "stage0" => Ok(Self::None),
            "minimal" | "stagei" | "stage1" => Ok(Self::Minimal),
            "mild" | "stageii" | "stage2" => Ok(Self::Mild),
            "moderate" | "stageiii" | "stage3" => Ok(Self::Moderate),
            "severe" | "stageiv" | "stage4" => Ok(Self::Severe),
            _ => Err(ParseLabelError::new("endometriosis stage", s)),
        }
    }
}

/// Uterine myoma location (FIGO grouping).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MyomaType {
    None,
    Submucosal,
    Intramural,
    Subserosal,
}

impl FromStr for MyomaType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "none" => Ok(Self::None),
            "submucosal" => Ok(Self::Submucosal),
            "intramural" => Ok(Self::Intramural),
            "subserosal" => Ok(Self::Subserosal),
            _ => Err(ParseLabelError::new("myoma type", s)),
        }
    }
}

/// Adenomyosis pattern on imaging.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AdenomyosisType {
    None,
    Focal,
    Diffuse,
}

impl FromStr for AdenomyosisType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "none" => Ok(Self::None),
            "focal" => Ok(Self::Focal),
            "diffuse" => Ok(Self::Diffuse),
            _ => Err(ParseLabelError::new("adenomyosis type", s)),
        }
    }
}

/// Endometrial polyp burden.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PolypType {
    None,
    Single,
    Multiple,
}

impl FromStr for PolypType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "none" => Ok(Self::None),
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            _ => Err(ParseLabelError::new("polyp type", s)),
        }
    }
}

/// Hysterosalpingogram result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TubalPatency {
    Normal,
    UnilateralObstruction,
    BilateralObstruction,
}

impl FromStr for TubalPatency {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "normal" | "patent" => Ok(Self::Normal),
            "unilateral" | "unilateralobstruction" => Ok(Self::UnilateralObstruction),
            "bilateral" | "bilateralobstruction" => Ok(Self::BilateralObstruction),
            _ => Err(ParseLabelError::new("tubal patency", s)),
        }
    }
}

/// Rotterdam PCOS phenotype.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PcosPhenotype {
    /// Hyperandrogenism + ovulatory dysfunction + polycystic morphology
    A,
    /// Hyperandrogenism + ovulatory dysfunction
    B,
    /// Hyperandrogenism + polycystic morphology (ovulatory)
    C,
    /// Ovulatory dysfunction + polycystic morphology (non-hyperandrogenic)
    D,
}

impl FromStr for PcosPhenotype {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).trim_start_matches("phenotype") {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            _ => Err(ParseLabelError::new("PCOS phenotype", s)),
        }
    }
}

macro_rules! display_as_debug {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self)
            }
        })*
    };
}

display_as_debug!(EndometriosisStage, MyomaType, AdenomyosisType, PolypType, TubalPatency, PcosPhenotype);

/// Semen analysis of the male partner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SemenAnalysis {
    /// Sperm concentration (million/mL)
    pub concentration: Option<f64>,
    /// Progressive motility (%)
    pub motility: Option<f64>,
    /// Normal forms, strict criteria (%)
    pub morphology: Option<f64>,
    /// Sperm DNA fragmentation index (%)
    pub dna_fragmentation: Option<f64>,
    /// Clinical varicocele
    pub varicocele: Option<bool>,
    /// Positive seminal culture
    pub seminal_culture_positive: Option<bool>,
}

impl SemenAnalysis {
    /// True when at least one of the three basic parameters was measured.
    pub fn has_basic_parameters(&self) -> bool {
        self.concentration.is_some() || self.motility.is_some() || self.morphology.is_some()
    }

    /// True when no male-factor input is present.
    pub fn is_empty(&self) -> bool {
        !self.has_basic_parameters()
            && self.dna_fragmentation.is_none()
            && self.varicocele.is_none()
            && self.seminal_culture_positive.is_none()
    }
}

/// Clinical profile of a couple seeking a fertility estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClinicalProfile {
    /// Female age in years (mandatory for computation)
    pub age: Option<f64>,
    /// Height in cm
    pub height_cm: Option<f64>,
    /// Weight in kg
    pub weight_kg: Option<f64>,
    /// Precomputed BMI (kg/m²); takes precedence over height/weight
    pub bmi: Option<f64>,
    /// Anti-Müllerian hormone (ng/mL)
    pub amh: Option<f64>,
    /// Thyroid stimulating hormone (mIU/L)
    pub tsh: Option<f64>,
    /// Prolactin (ng/mL)
    pub prolactin: Option<f64>,
    /// HOMA-IR insulin resistance index
    pub homa_ir: Option<f64>,
    /// Average cycle length in days
    pub cycle_length_days: Option<f64>,
    /// Time trying to conceive, in years
    pub infertility_duration_years: Option<f64>,
    /// Number of previous pelvic surgeries
    pub pelvic_surgery_count: Option<u32>,
    /// Number of previous pregnancies
    pub parity: Option<u32>,
    /// PCOS diagnosis
    pub has_pcos: Option<bool>,
    /// PCOS phenotype, when known
    pub pcos_phenotype: Option<PcosPhenotype>,
    pub endometriosis_stage: Option<EndometriosisStage>,
    pub myoma_type: Option<MyomaType>,
    /// Largest myoma diameter in cm
    pub myoma_size_cm: Option<f64>,
    pub adenomyosis: Option<AdenomyosisType>,
    pub polyp: Option<PolypType>,
    /// HSG result
    pub tubal_patency: Option<TubalPatency>,
    /// Bilateral tubal occlusion confirmed by laparoscopy or prior ligation
    pub bilateral_tubal_occlusion: Option<bool>,
    /// Male partner semen analysis
    pub semen: SemenAnalysis,
}

impl ClinicalProfile {
    /// Create a profile with only the mandatory age set.
    pub fn new(age: f64) -> Self {
        Self {
            age: Some(age),
            ..Self::default()
        }
    }

    /// BMI computed from height and weight, when both are present.
    pub fn computed_bmi(&self) -> Option<f64> {
        match (self.height_cm, self.weight_kg) {
            (Some(h), Some(w)) if h > 0.0 => {
                let meters = h / 100.0;
                Some(w / (meters * meters))
            }
            _ => None,
        }
    }

    /// Whether PCOS is present (a phenotype implies the diagnosis unless denied).
    pub fn pcos_present(&self) -> bool {
        match self.has_pcos {
            Some(flag) => flag,
            None => self.pcos_phenotype.is_some(),
        }
    }

    /// Whether bilateral tubal occlusion is documented by any source.
    pub fn bilateral_occlusion(&self) -> bool {
        self.tubal_patency == Some(TubalPatency::BilateralObstruction)
            || self.bilateral_tubal_occlusion == Some(true)
    }

    /// Serialize to canonical JSON for fingerprinting.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
