//! Medical factor aggregation.
//!
//! Derives one multiplier per axis. An axis whose input is absent stays at
//! the neutral 1.0; age is mandatory and always computed. Nothing here
//! clamps or combines factors.

use crate::factors;
use crate::models::{MedicalFactors, NEUTRAL};
use crate::validation::ValidatedProfile;

/// Build the per-axis factors for a validated profile.
pub fn aggregate(validated: &ValidatedProfile) -> MedicalFactors {
    let profile = validated.profile();
    let or_neutral = |value: Option<f64>, f: fn(f64) -> f64| value.map_or(NEUTRAL, f);

    let factors = MedicalFactors {
        age: factors::age_factor(validated.age()),
        bmi: or_neutral(validated.bmi(), factors::bmi_factor),
        cycle: or_neutral(profile.cycle_length_days, factors::cycle_factor),
        infertility_duration: or_neutral(
            profile.infertility_duration_years,
            factors::infertility_duration_factor,
        ),
        amh: or_neutral(profile.amh, factors::amh_factor),
        tsh: or_neutral(profile.tsh, factors::tsh_factor),
        prolactin: or_neutral(profile.prolactin, factors::prolactin_factor),
        homa_ir: or_neutral(profile.homa_ir, factors::homa_ir_factor),
        parity: profile.parity.map_or(NEUTRAL, factors::parity_factor),
        pcos: if profile.pcos_present() {
            factors::pcos_factor(profile.pcos_phenotype)
        } else {
            NEUTRAL
        },
        endometriosis: profile
            .endometriosis_stage
            .map_or(NEUTRAL, factors::endometriosis_factor),
        myoma: profile
            .myoma_type
            .map_or(NEUTRAL, |kind| factors::myoma_factor(kind, profile.myoma_size_cm)),
        polyp: profile.polyp.map_or(NEUTRAL, factors::polyp_factor),
        adenomyosis: profile.adenomyosis.map_or(NEUTRAL, factors::adenomyosis_factor),
        hsg: profile.tubal_patency.map_or(NEUTRAL, factors::hsg_factor),
        otb: factors::otb_factor(profile.bilateral_occlusion()),
        pelvic_surgery: profile
            .pelvic_surgery_count
            .map_or(NEUTRAL, factors::pelvic_surgery_factor),
        male: if profile.semen.is_empty() {
            NEUTRAL
        } else {
            factors::male_factor(&profile.semen)
        },
    };

    tracing::debug!(
        age = factors.age,
        non_neutral = factors.non_neutral().count(),
        "Aggregated medical factors"
    );
    factors
}
