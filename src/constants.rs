// Constants — conversion factors, syringe graduations and sweep sample sets.

use crate::types::{DoseUnit, DosingFrequency, SyringeSize};

// Unit conversion
pub const MCG_PER_MG: f64 = 1000.0;

// Insulin-style barrels are graduated in hundredths of a millilitre,
// whatever the printed capacity.
pub const UNITS_PER_ML: f64 = 100.0;

/// Supported barrels as (capacity in mL, total printed units).
pub const SYRINGE_TABLE: &[(f64, f64)] = &[(0.3, 30.0), (0.5, 50.0), (1.0, 100.0)];

/// Tolerance used when matching a requested capacity against `SYRINGE_TABLE`.
pub const CAPACITY_TOLERANCE_ML: f64 = 1e-9;

/// Smallest draw that can be read reliably off a standard insulin syringe.
pub const MIN_MEASURABLE_VOLUME_ML: f64 = 0.01;

// Relative tolerance for floating-point invariants
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

// Sample sets for the randomized sweep
pub const PEPTIDE_MASSES_MG: &[f64] = &[1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 50.0];
pub const DILUENT_VOLUMES_ML: &[f64] = &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 5.0, 10.0];
pub const DOSES: &[f64] = &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 50.0, 100.0, 250.0, 500.0, 1000.0];
pub const DOSE_UNITS: &[DoseUnit] = &[DoseUnit::Mcg, DoseUnit::Mg];
pub const SYRINGE_SIZES: &[SyringeSize] =
    &[SyringeSize::ThirdCc, SyringeSize::HalfCc, SyringeSize::OneCc];
pub const FREQUENCIES: &[Option<DosingFrequency>] = &[
    None,
    Some(DosingFrequency::OnceDaily),
    Some(DosingFrequency::TwiceDaily),
    Some(DosingFrequency::EveryOtherDay),
    Some(DosingFrequency::ThreeTimesWeekly),
    Some(DosingFrequency::FiveOnTwoOff),
    Some(DosingFrequency::Weekly),
];
