// Pure functions — the reconstitution arithmetic.
// Nothing here rounds; rounding belongs to `presentation`.

use crate::constants::*;
use crate::error::ValidationError;
use crate::types::*;

/// Reject anything that is not a finite, strictly positive number.
pub fn require_positive(field: InputField, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveInput { field, value })
    }
}

/// Desired dose normalised to micrograms.
pub fn dose_in_mcg(desired_dose: f64, unit: DoseUnit) -> f64 {
    desired_dose * unit.mcg_factor()
}

/// Peptide concentration after reconstitution, in mcg per mL.
pub fn concentration_mcg_per_ml(peptide_mass_mg: f64, diluent_volume_ml: f64) -> f64 {
    (peptide_mass_mg * MCG_PER_MG) / diluent_volume_ml
}

/// Volume that carries `dose_mcg` at the given concentration.
pub fn draw_volume_ml(dose_mcg: f64, concentration_mcg_per_ml: f64) -> f64 {
    dose_mcg / concentration_mcg_per_ml
}

/// Barrel reading for a volume: `(volume / capacity) * total_units`.
pub fn syringe_units(volume_ml: f64, syringe: SyringeSize) -> f64 {
    (volume_ml / syringe.capacity_ml()) * syringe.total_units()
}

/// Dose actually delivered by drawing to `units` on a barrel.
pub fn dose_delivered_mcg(units: f64, syringe: SyringeSize, concentration_mcg_per_ml: f64) -> f64 {
    (units / syringe.total_units()) * syringe.capacity_ml() * concentration_mcg_per_ml
}

/// A derived quantity must stay finite and non-zero; blame `field` when it does not.
fn require_finite_result(
    derived: f64,
    field: InputField,
    value: f64,
) -> Result<f64, ValidationError> {
    if derived.is_finite() && derived != 0.0 {
        Ok(derived)
    } else {
        Err(ValidationError::NonPositiveInput { field, value })
    }
}

struct Validated {
    dose_mcg: f64,
    syringe: SyringeSize,
    doses_per_day: Option<f64>,
}

fn validate(input: &ReconstitutionInput) -> Result<Validated, ValidationError> {
    require_positive(InputField::PeptideMassMg, input.peptide_mass_mg)?;
    require_positive(InputField::DiluentVolumeMl, input.diluent_volume_ml)?;
    require_positive(InputField::DesiredDose, input.desired_dose)?;
    let doses_per_day = input
        .doses_per_day
        .map(|per_day| require_positive(InputField::DosesPerDay, per_day))
        .transpose()?;
    let syringe = SyringeSize::try_from(input.syringe_capacity_ml)?;

    let dose_mcg = require_finite_result(
        dose_in_mcg(input.desired_dose, input.dose_unit),
        InputField::DesiredDose,
        input.desired_dose,
    )?;

    Ok(Validated {
        dose_mcg,
        syringe,
        doses_per_day,
    })
}

/// Work out concentration, draw volume, syringe reading and supply for one vial.
pub fn calculate(input: &ReconstitutionInput) -> Result<ReconstitutionResult, ValidationError> {
    let Validated {
        dose_mcg,
        syringe,
        doses_per_day,
    } = validate(input)?;

    let mass = input.peptide_mass_mg;
    let diluent = input.diluent_volume_ml;
    let dose = input.desired_dose;

    let peptide_mass_mcg =
        require_finite_result(mass * MCG_PER_MG, InputField::PeptideMassMg, mass)?;
    let concentration_mcg_per_ml = require_finite_result(
        peptide_mass_mcg / diluent,
        InputField::DiluentVolumeMl,
        diluent,
    )?;
    let concentration_mg_per_ml =
        require_finite_result(mass / diluent, InputField::DiluentVolumeMl, diluent)?;

    let draw_volume_ml = require_finite_result(
        draw_volume_ml(dose_mcg, concentration_mcg_per_ml),
        InputField::DesiredDose,
        dose,
    )?;
    let syringe_units_to_draw = require_finite_result(
        syringe_units(draw_volume_ml, syringe),
        InputField::DesiredDose,
        dose,
    )?;

    let total_doses_per_vial = require_finite_result(
        peptide_mass_mcg / dose_mcg,
        InputField::DesiredDose,
        dose,
    )?;
    let days_of_supply = doses_per_day
        .map(|per_day| {
            require_finite_result(total_doses_per_vial / per_day, InputField::DosesPerDay, per_day)
        })
        .transpose()?;

    Ok(ReconstitutionResult {
        concentration_mcg_per_ml,
        concentration_mg_per_ml,
        draw_volume_ml,
        syringe_units_to_draw,
        total_doses_per_vial,
        days_of_supply,
        volume_too_small: draw_volume_ml < MIN_MEASURABLE_VOLUME_ML,
        volume_exceeds_syringe: draw_volume_ml > syringe.capacity_ml(),
    })
}

/// Largest dose a single full barrel delivers at the input's concentration, in mcg.
pub fn max_dose_per_draw_mcg(input: &ReconstitutionInput) -> Result<f64, ValidationError> {
    let Validated { syringe, .. } = validate(input)?;
    let concentration = require_finite_result(
        concentration_mcg_per_ml(input.peptide_mass_mg, input.diluent_volume_ml),
        InputField::DiluentVolumeMl,
        input.diluent_volume_ml,
    )?;
    require_finite_result(
        syringe.capacity_ml() * concentration,
        InputField::DiluentVolumeMl,
        input.diluent_volume_ml,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_input() -> ReconstitutionInput {
        ReconstitutionInput {
            peptide_mass_mg: 5.0,
            diluent_volume_ml: 2.0,
            desired_dose: 250.0,
            dose_unit: DoseUnit::Mcg,
            syringe_capacity_ml: 1.0,
            doses_per_day: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= RELATIVE_TOLERANCE * b.abs().max(1.0)
    }

    #[test]
    fn test_dose_in_mcg() {
        assert_eq!(dose_in_mcg(250.0, DoseUnit::Mcg), 250.0);
        assert_eq!(dose_in_mcg(2.5, DoseUnit::Mg), 2500.0);
    }

    #[test]
    fn test_basic_calculation() {
        let result = calculate(&default_input()).unwrap();
        assert_eq!(result.concentration_mcg_per_ml, 2500.0);
        assert_eq!(result.concentration_mg_per_ml, 2.5);
        assert!(approx(result.draw_volume_ml, 0.1));
        assert!(approx(result.syringe_units_to_draw, 10.0));
        assert!(approx(result.total_doses_per_vial, 20.0));
        assert_eq!(result.days_of_supply, None);
        assert!(!result.volume_too_small);
        assert!(!result.volume_exceeds_syringe);
    }

    #[test]
    fn test_mg_dose_unit() {
        let input = ReconstitutionInput {
            desired_dose: 0.25,
            dose_unit: DoseUnit::Mg,
            ..default_input()
        };
        let result = calculate(&input).unwrap();
        assert!(approx(result.draw_volume_ml, 0.1));
        assert!(approx(result.total_doses_per_vial, 20.0));
    }

    #[test]
    fn test_non_positive_inputs_name_the_field() {
        let zero_mass = ReconstitutionInput {
            peptide_mass_mg: 0.0,
            ..default_input()
        };
        assert_eq!(
            calculate(&zero_mass).unwrap_err().field(),
            Some(InputField::PeptideMassMg)
        );

        let negative_diluent = ReconstitutionInput {
            diluent_volume_ml: -1.0,
            ..default_input()
        };
        assert_eq!(
            calculate(&negative_diluent).unwrap_err().field(),
            Some(InputField::DiluentVolumeMl)
        );

        let nan_dose = ReconstitutionInput {
            desired_dose: f64::NAN,
            ..default_input()
        };
        assert_eq!(
            calculate(&nan_dose).unwrap_err().field(),
            Some(InputField::DesiredDose)
        );

        let infinite_mass = ReconstitutionInput {
            peptide_mass_mg: f64::INFINITY,
            ..default_input()
        };
        assert_eq!(calculate(&infinite_mass).unwrap_err().kind(), "NonPositiveInput");
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let input = ReconstitutionInput {
            doses_per_day: Some(0.0),
            ..default_input()
        };
        assert_eq!(
            calculate(&input).unwrap_err().field(),
            Some(InputField::DosesPerDay)
        );
    }

    #[test]
    fn test_unsupported_syringe() {
        let input = ReconstitutionInput {
            syringe_capacity_ml: 3.0,
            ..default_input()
        };
        assert_eq!(
            calculate(&input).unwrap_err(),
            ValidationError::UnsupportedSyringeSize { capacity_ml: 3.0 }
        );
    }

    #[test]
    fn test_mass_checked_before_syringe() {
        let input = ReconstitutionInput {
            peptide_mass_mg: -5.0,
            syringe_capacity_ml: 3.0,
            ..default_input()
        };
        assert_eq!(calculate(&input).unwrap_err().kind(), "NonPositiveInput");
    }

    #[test]
    fn test_units_follow_barrel_graduations() {
        for capacity in [0.3, 0.5, 1.0] {
            let input = ReconstitutionInput {
                syringe_capacity_ml: capacity,
                ..default_input()
            };
            let result = calculate(&input).unwrap();
            // 0.1 mL is always 10 units
            assert!(approx(result.syringe_units_to_draw, 10.0));
        }
    }

    #[test]
    fn test_dose_delivered_inverts_syringe_units() {
        let result = calculate(&default_input()).unwrap();
        let delivered = dose_delivered_mcg(
            result.syringe_units_to_draw,
            SyringeSize::OneCc,
            result.concentration_mcg_per_ml,
        );
        assert!(approx(delivered, 250.0));
    }

    #[test]
    fn test_max_dose_per_draw() {
        assert_eq!(max_dose_per_draw_mcg(&default_input()).unwrap(), 2500.0);

        let third = ReconstitutionInput {
            syringe_capacity_ml: 0.3,
            ..default_input()
        };
        assert!(approx(max_dose_per_draw_mcg(&third).unwrap(), 750.0));

        let invalid = ReconstitutionInput {
            diluent_volume_ml: 0.0,
            ..default_input()
        };
        assert!(max_dose_per_draw_mcg(&invalid).is_err());
    }

    #[test]
    fn test_overflowing_mass_rejected() {
        let input = ReconstitutionInput {
            peptide_mass_mg: 1e306,
            diluent_volume_ml: 1e-3,
            ..default_input()
        };
        assert_eq!(
            calculate(&input),
            Err(ValidationError::NonPositiveInput {
                field: InputField::PeptideMassMg,
                value: 1e306,
            })
        );
    }

    #[test]
    fn test_concentration_overflow_blames_diluent() {
        let input = ReconstitutionInput {
            peptide_mass_mg: 1e300,
            diluent_volume_ml: 1e-10,
            ..default_input()
        };
        assert_eq!(
            calculate(&input).unwrap_err().field(),
            Some(InputField::DiluentVolumeMl)
        );
    }

    #[test]
    fn test_subnormal_dose_rejected() {
        let input = ReconstitutionInput {
            desired_dose: 5e-324,
            ..default_input()
        };
        assert_eq!(
            calculate(&input).unwrap_err().field(),
            Some(InputField::DesiredDose)
        );

        let huge_mg = ReconstitutionInput {
            desired_dose: f64::MAX,
            dose_unit: DoseUnit::Mg,
            ..default_input()
        };
        assert_eq!(
            calculate(&huge_mg).unwrap_err().field(),
            Some(InputField::DesiredDose)
        );
    }

    #[test]
    fn test_tiny_frequency_overflowing_supply_rejected() {
        let input = ReconstitutionInput {
            peptide_mass_mg: 1e300,
            doses_per_day: Some(1e-300),
            ..default_input()
        };
        assert_eq!(
            calculate(&input).unwrap_err().field(),
            Some(InputField::DosesPerDay)
        );
    }

    #[test]
    fn test_days_of_supply() {
        let input = ReconstitutionInput {
            doses_per_day: Some(2.0),
            ..default_input()
        };
        let result = calculate(&input).unwrap();
        assert!(approx(result.days_of_supply.unwrap(), 10.0));
    }
}
