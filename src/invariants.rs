// Correctness invariants — every successful calculation must satisfy all of these.

use crate::constants::*;
use crate::logic::dose_in_mcg;
use crate::types::*;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= RELATIVE_TOLERANCE * expected.abs()
}

/// concentrationMcgPerMl = (peptideMassMg * 1000) / diluentVolumeMl, exactly
pub fn concentration_matches_mass(input: &ReconstitutionInput, result: &ReconstitutionResult) -> bool {
    result.concentration_mcg_per_ml == (input.peptide_mass_mg * MCG_PER_MG) / input.diluent_volume_ml
}

/// drawVolumeMl * concentrationMcgPerMl ≈ desired dose in mcg
pub fn draw_volume_round_trips(input: &ReconstitutionInput, result: &ReconstitutionResult) -> bool {
    let dose_mcg = dose_in_mcg(input.desired_dose, input.dose_unit);
    close(result.draw_volume_ml * result.concentration_mcg_per_ml, dose_mcg)
}

/// syringeUnitsToDraw = drawVolumeMl * 100, for every supported barrel
pub fn syringe_units_scale(input: &ReconstitutionInput, result: &ReconstitutionResult) -> bool {
    match SyringeSize::try_from(input.syringe_capacity_ml) {
        Ok(syringe) => {
            syringe.total_units() / syringe.capacity_ml() == UNITS_PER_ML
                && close(result.syringe_units_to_draw, result.draw_volume_ml * UNITS_PER_ML)
        }
        Err(_) => false,
    }
}

/// totalDosesPerVial * doseMcg ≈ peptide mass in mcg
pub fn doses_per_vial_consistent(input: &ReconstitutionInput, result: &ReconstitutionResult) -> bool {
    let dose_mcg = dose_in_mcg(input.desired_dose, input.dose_unit);
    close(result.total_doses_per_vial * dose_mcg, input.peptide_mass_mg * MCG_PER_MG)
}

/// volumeTooSmall iff drawVolumeMl < 0.01
pub fn too_small_flag_consistent(_input: &ReconstitutionInput, result: &ReconstitutionResult) -> bool {
    result.volume_too_small == (result.draw_volume_ml < MIN_MEASURABLE_VOLUME_ML)
}

/// volumeExceedsSyringe iff drawVolumeMl > the matched barrel's capacity
pub fn exceeds_flag_consistent(input: &ReconstitutionInput, result: &ReconstitutionResult) -> bool {
    match SyringeSize::try_from(input.syringe_capacity_ml) {
        Ok(syringe) => result.volume_exceeds_syringe == (result.draw_volume_ml > syringe.capacity_ml()),
        Err(_) => false,
    }
}

/// daysOfSupply present iff dosesPerDay given, and equal to doses / frequency
pub fn days_of_supply_consistent(input: &ReconstitutionInput, result: &ReconstitutionResult) -> bool {
    match (input.doses_per_day, result.days_of_supply) {
        (None, None) => true,
        (Some(per_day), Some(days)) => close(days * per_day, result.total_doses_per_vial),
        _ => false,
    }
}

pub type Invariant = fn(&ReconstitutionInput, &ReconstitutionResult) -> bool;

/// All individual invariants with names for reporting.
pub const ALL_INVARIANTS: &[(&str, Invariant)] = &[
    ("concentrationMatchesMass", concentration_matches_mass),
    ("drawVolumeRoundTrips", draw_volume_round_trips),
    ("syringeUnitsScale", syringe_units_scale),
    ("dosesPerVialConsistent", doses_per_vial_consistent),
    ("tooSmallFlagConsistent", too_small_flag_consistent),
    ("exceedsFlagConsistent", exceeds_flag_consistent),
    ("daysOfSupplyConsistent", days_of_supply_consistent),
];

/// Check all invariants and return the name of the first violated one, if any.
pub fn check_invariants(
    input: &ReconstitutionInput,
    result: &ReconstitutionResult,
) -> Result<(), &'static str> {
    for (name, check) in ALL_INVARIANTS {
        if !check(input, result) {
            return Err(name);
        }
    }
    Ok(())
}
