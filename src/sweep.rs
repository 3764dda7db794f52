// Sweep — randomized invariant checking over sampled calculator inputs.
// Each sample picks one value from every sample set, calculates, and checks
// all invariants on the result.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::constants::*;
use crate::error::ValidationError;
use crate::invariants;
use crate::logic;
use crate::types::*;

fn pick<T: Copy>(options: &[T], rng: &mut impl Rng) -> Option<T> {
    options.choose(rng).copied()
}

/// Draw one input from the sample sets.
pub fn sample_input(rng: &mut impl Rng) -> Option<ReconstitutionInput> {
    Some(ReconstitutionInput {
        peptide_mass_mg: pick(PEPTIDE_MASSES_MG, rng)?,
        diluent_volume_ml: pick(DILUENT_VOLUMES_ML, rng)?,
        desired_dose: pick(DOSES, rng)?,
        dose_unit: pick(DOSE_UNITS, rng)?,
        syringe_capacity_ml: pick(SYRINGE_SIZES, rng)?.capacity_ml(),
        doses_per_day: pick(FREQUENCIES, rng)?.map(DosingFrequency::doses_per_day),
    })
}

/// Why a sample failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// A sampled input was rejected; every sample set holds only valid values.
    Rejected(String),
    Invariant(&'static str),
}

pub struct ViolationInfo {
    pub failure: Failure,
    pub sample: usize,
    pub input: ReconstitutionInput,
}

pub struct SweepResult {
    pub samples: usize,
    pub checked: usize,
    pub seed: u64,
    pub flagged_too_small: usize,
    pub flagged_exceeds: usize,
    pub elapsed: std::time::Duration,
    pub violation: Option<ViolationInfo>,
}

/// Check one calculation outcome: a rejection or a broken invariant is a failure.
pub fn check_sample(
    input: &ReconstitutionInput,
    outcome: Result<ReconstitutionResult, ValidationError>,
) -> Result<ReconstitutionResult, Failure> {
    let result = outcome.map_err(|e| Failure::Rejected(e.to_string()))?;
    invariants::check_invariants(input, &result).map_err(Failure::Invariant)?;
    Ok(result)
}

/// Run `samples` random calculations, stopping at the first failure.
pub fn run_sweep(samples: usize, seed: u64) -> SweepResult {
    run_sweep_with(samples, seed, logic::calculate)
}

/// As [`run_sweep`], with the calculation supplied by the caller.
pub fn run_sweep_with<F>(samples: usize, seed: u64, calculate: F) -> SweepResult
where
    F: Fn(&ReconstitutionInput) -> Result<ReconstitutionResult, ValidationError>,
{
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let start = std::time::Instant::now();
    let mut checked = 0;
    let mut flagged_too_small = 0;
    let mut flagged_exceeds = 0;
    let mut violation = None;

    info!(samples, seed, "starting sweep");

    for sample in 0..samples {
        let Some(input) = sample_input(&mut rng) else {
            break;
        };

        let outcome = check_sample(&input, calculate(&input));
        checked += 1;

        match outcome {
            Ok(result) => {
                flagged_too_small += usize::from(result.volume_too_small);
                flagged_exceeds += usize::from(result.volume_exceeds_syringe);
            }
            Err(failure) => {
                warn!(sample, ?failure, "sweep sample failed");
                violation = Some(ViolationInfo {
                    failure,
                    sample,
                    input,
                });
                break;
            }
        }
    }

    SweepResult {
        samples,
        checked,
        seed,
        flagged_too_small,
        flagged_exceeds,
        elapsed: start.elapsed(),
        violation,
    }
}

impl std::fmt::Display for SweepResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let per_sec = self.checked as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON);
        writeln!(f)?;
        match &self.violation {
            None => {
                writeln!(
                    f,
                    "[ok] No violation found ({:.0}ms at {:.0} samples/second).",
                    self.elapsed.as_millis(),
                    per_sec,
                )?;
                writeln!(
                    f,
                    "Checked {} samples ({} too small to measure, {} over capacity).",
                    self.checked, self.flagged_too_small, self.flagged_exceeds,
                )?;
            }
            Some(v) => {
                match &v.failure {
                    Failure::Invariant(name) => writeln!(
                        f,
                        "[VIOLATION] Invariant '{}' violated at sample {}.",
                        name, v.sample,
                    )?,
                    Failure::Rejected(reason) => writeln!(
                        f,
                        "[VIOLATION] Sample {} rejected: {}.",
                        v.sample, reason,
                    )?,
                }
                writeln!(f, "Input at violation:")?;
                writeln!(f, "{}", v.input)?;
            }
        }
        writeln!(f, "Seed: {} ", self.seed)
    }
}
