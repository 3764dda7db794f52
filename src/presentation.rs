// Presentation — the display-side view of a calculation.
// Results are rounded here and nowhere else. Every displayed figure is
// derived from the unrounded result, so a rounded syringe reading is never
// fed back into the displayed dose.

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;
use crate::types::ReconstitutionResult;

/// Round to `places` decimals, the same way `{:.N}` formatting does.
///
/// Rounding applies to the stored binary value, not to the decimal literal
/// it was written as: `0.1455` is stored just below the halfway point and
/// rounds to `0.145`.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Non-blocking advisories shown alongside a valid result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Warning {
    VolumeTooSmall,
    ExceedsSyringe,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::VolumeTooSmall => f.write_str(
                "draw volume is below 0.01 mL and cannot be measured reliably; use more diluent",
            ),
            Warning::ExceedsSyringe => f.write_str(
                "draw volume exceeds the syringe capacity; use less diluent or a larger syringe",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayResult {
    pub concentration_mcg_per_ml: f64,
    pub concentration_mg_per_ml: f64,
    pub draw_volume_ml: f64,
    pub syringe_units_to_draw: f64,
    /// Dose carried by the unrounded draw volume.
    pub dose_per_draw_mcg: f64,
    pub total_doses_per_vial: f64,
    pub days_of_supply: Option<f64>,
    pub warnings: Vec<Warning>,
}

impl From<&ReconstitutionResult> for DisplayResult {
    fn from(result: &ReconstitutionResult) -> Self {
        let mut warnings = Vec::new();
        if result.volume_too_small {
            warnings.push(Warning::VolumeTooSmall);
        }
        if result.volume_exceeds_syringe {
            warnings.push(Warning::ExceedsSyringe);
        }

        Self {
            concentration_mcg_per_ml: round_to(result.concentration_mcg_per_ml, 0),
            concentration_mg_per_ml: round_to(result.concentration_mg_per_ml, 2),
            draw_volume_ml: round_to(result.draw_volume_ml, 3),
            syringe_units_to_draw: round_to(result.syringe_units_to_draw, 1),
            dose_per_draw_mcg: round_to(
                result.draw_volume_ml * result.concentration_mcg_per_ml,
                2,
            ),
            total_doses_per_vial: round_to(result.total_doses_per_vial, 1),
            days_of_supply: result.days_of_supply.map(|days| round_to(days, 1)),
            warnings,
        }
    }
}

impl fmt::Display for DisplayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  concentration:        {:.0} mcg/mL ({:.2} mg/mL)",
            self.concentration_mcg_per_ml, self.concentration_mg_per_ml
        )?;
        writeln!(f, "  draw_volume:          {:.3} mL", self.draw_volume_ml)?;
        writeln!(f, "  syringe_units:        {:.1} units", self.syringe_units_to_draw)?;
        writeln!(f, "  dose_per_draw:        {:.2} mcg", self.dose_per_draw_mcg)?;
        write!(f, "  doses_per_vial:       {:.1}", self.total_doses_per_vial)?;
        if let Some(days) = self.days_of_supply {
            write!(f, "\n  days_of_supply:       {:.1}", days)?;
        }
        for warning in &self.warnings {
            write!(f, "\n  warning: {}", warning)?;
        }
        Ok(())
    }
}

/// What the calculator shows for the current inputs.
///
/// A `Placeholder` is a blank "no result yet" state, kept distinct from a
/// real result so that half-typed input never renders as a zero dose.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Presentation {
    Ready(DisplayResult),
    Placeholder { reason: String },
}

impl Presentation {
    pub fn is_ready(&self) -> bool {
        matches!(self, Presentation::Ready(_))
    }

    pub fn placeholder(reason: impl Into<String>) -> Self {
        Presentation::Placeholder {
            reason: reason.into(),
        }
    }
}

impl From<Result<ReconstitutionResult, ValidationError>> for Presentation {
    fn from(outcome: Result<ReconstitutionResult, ValidationError>) -> Self {
        match outcome {
            Ok(result) => Presentation::Ready(DisplayResult::from(&result)),
            Err(e) => Presentation::placeholder(e.to_string()),
        }
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presentation::Ready(display) => write!(f, "{}", display),
            Presentation::Placeholder { reason } => write!(f, "  --  ({})", reason),
        }
    }
}
