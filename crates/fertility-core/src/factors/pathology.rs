//! Anatomical pathology calculators.

use super::{lookup_or, Band};
use crate::models::{AdenomyosisType, EndometriosisStage, MyomaType, PolypType, TubalPatency};

const NEG: f64 = f64::NEG_INFINITY;
const POS: f64 = f64::INFINITY;

/// Submucosal myoma by diameter (cm); distortion of the cavity from 1 cm.
pub const SUBMUCOSAL_MYOMA_BANDS: &[Band] = &[
    Band::constant(NEG, 1.0, 0.80),
    Band::constant(1.0, POS, 0.50),
];

/// Intramural myoma by diameter (cm).
pub const INTRAMURAL_MYOMA_BANDS: &[Band] = &[
    Band::constant(NEG, 4.0, 0.90),
    Band::constant(4.0, POS, 0.70),
];

/// Subserosal myoma by diameter (cm).
pub const SUBSEROSAL_MYOMA_BANDS: &[Band] = &[
    Band::constant(NEG, 5.0, 1.0),
    Band::constant(5.0, POS, 0.95),
];

/// Multiplier on the OTB axis when both tubes are blocked.
pub const BILATERAL_OCCLUSION_FACTOR: f64 = 0.01;

pub fn endometriosis_factor(stage: EndometriosisStage) -> f64 {
    match stage {
        EndometriosisStage::None => 1.0,
        EndometriosisStage::Minimal => 0.85,
        EndometriosisStage::Mild => 0.70,
        EndometriosisStage::Moderate => 0.50,
        EndometriosisStage::Severe => 0.35,
    }
}

/// Myoma multiplier by location and largest diameter.
///
/// An unknown size is scored as a small lesion.
pub fn myoma_factor(kind: MyomaType, size_cm: Option<f64>) -> f64 {
    let size = size_cm.unwrap_or(0.0);
    match kind {
        MyomaType::None => 1.0,
        MyomaType::Submucosal => lookup_or(SUBMUCOSAL_MYOMA_BANDS, size, 0.50, "submucosal_myoma"),
        MyomaType::Intramural => lookup_or(INTRAMURAL_MYOMA_BANDS, size, 0.70, "intramural_myoma"),
        MyomaType::Subserosal => lookup_or(SUBSEROSAL_MYOMA_BANDS, size, 0.95, "subserosal_myoma"),
    }
}

pub fn adenomyosis_factor(kind: AdenomyosisType) -> f64 {
    match kind {
        AdenomyosisType::None => 1.0,
        AdenomyosisType::Focal => 0.80,
        AdenomyosisType::Diffuse => 0.55,
    }
}

pub fn polyp_factor(kind: PolypType) -> f64 {
    match kind {
        PolypType::None => 1.0,
        PolypType::Single => 0.85,
        PolypType::Multiple => 0.70,
    }
}

/// HSG multiplier.
///
/// Bilateral obstruction is neutral here: it is scored once, on the OTB axis.
pub fn hsg_factor(patency: TubalPatency) -> f64 {
    match patency {
        TubalPatency::Normal => 1.0,
        TubalPatency::UnilateralObstruction => 0.75,
        TubalPatency::BilateralObstruction => 1.0,
    }
}

pub fn otb_factor(bilateral_occlusion: bool) -> f64 {
    if bilateral_occlusion {
        BILATERAL_OCCLUSION_FACTOR
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endometriosis_stages_non_increasing() {
        let stages = [
            EndometriosisStage::None,
            EndometriosisStage::Minimal,
            EndometriosisStage::Mild,
            EndometriosisStage::Moderate,
            EndometriosisStage::Severe,
        ];
        let values: Vec<f64> = stages.iter().map(|&s| endometriosis_factor(s)).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(endometriosis_factor(EndometriosisStage::Moderate), 0.50);
    }

    #[test]
    fn test_submucosal_size_threshold() {
        assert_eq!(myoma_factor(MyomaType::Submucosal, Some(0.8)), 0.80);
        assert_eq!(myoma_factor(MyomaType::Submucosal, Some(1.0)), 0.50);
        assert!(myoma_factor(MyomaType::Submucosal, Some(1.0)) < myoma_factor(MyomaType::Submucosal, Some(0.9)));
    }

    #[test]
    fn test_myoma_types() {
        assert_eq!(myoma_factor(MyomaType::None, Some(8.0)), 1.0);
        assert_eq!(myoma_factor(MyomaType::Intramural, Some(5.0)), 0.70);
        assert_eq!(myoma_factor(MyomaType::Intramural, None), 0.90);
        assert_eq!(myoma_factor(MyomaType::Subserosal, Some(3.0)), 1.0);
        assert_eq!(myoma_factor(MyomaType::Subserosal, Some(6.0)), 0.95);
    }

    #[test]
    fn test_location_severity_order() {
        let size = Some(4.5);
        assert!(myoma_factor(MyomaType::Submucosal, size) < myoma_factor(MyomaType::Intramural, size));
        assert!(myoma_factor(MyomaType::Intramural, size) < myoma_factor(MyomaType::Subserosal, size));
    }

    #[test]
    fn test_uterine_and_tubal_lookups() {
        assert_eq!(adenomyosis_factor(AdenomyosisType::Diffuse), 0.55);
        assert_eq!(polyp_factor(PolypType::Single), 0.85);
        assert_eq!(hsg_factor(TubalPatency::UnilateralObstruction), 0.75);
        assert_eq!(hsg_factor(TubalPatency::BilateralObstruction), 1.0);
        assert_eq!(otb_factor(true), 0.01);
        assert_eq!(otb_factor(false), 1.0);
    }
}
