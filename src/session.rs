// Calculator session — a live form re-evaluated on every edit.
// Fields may be empty while the researcher is still typing; those states
// present as placeholders rather than errors or zero results.

use std::fmt;

use tracing::debug;

use crate::error::ValidationError;
use crate::logic;
use crate::presentation::Presentation;
use crate::types::*;

pub const DEFAULT_SYRINGE_ML: f64 = 1.0;

/// One user edit to the calculator form.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEdit {
    SetPeptideMass(f64),
    SetDiluent(f64),
    SetDose(f64),
    SetDoseUnit(String),
    SetSyringe(f64),
    SetFrequency(DosingFrequency),
    ClearFrequency,
    Clear(InputField),
}

impl fmt::Display for InputEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEdit::SetPeptideMass(mg) => write!(f, "SetPeptideMass({})", mg),
            InputEdit::SetDiluent(ml) => write!(f, "SetDiluent({})", ml),
            InputEdit::SetDose(dose) => write!(f, "SetDose({})", dose),
            InputEdit::SetDoseUnit(unit) => write!(f, "SetDoseUnit({})", unit),
            InputEdit::SetSyringe(ml) => write!(f, "SetSyringe({})", ml),
            InputEdit::SetFrequency(freq) => write!(f, "SetFrequency({:?})", freq),
            InputEdit::ClearFrequency => write!(f, "ClearFrequency"),
            InputEdit::Clear(field) => write!(f, "Clear({:?})", field),
        }
    }
}

/// Draft state of the calculator form.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorSession {
    pub peptide_mass_mg: Option<f64>,
    pub diluent_volume_ml: Option<f64>,
    pub desired_dose: Option<f64>,
    pub dose_unit: DoseUnit,
    pub syringe_capacity_ml: f64,
    pub frequency: Option<DosingFrequency>,
    unit_error: Option<ValidationError>,
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self {
            peptide_mass_mg: None,
            diluent_volume_ml: None,
            desired_dose: None,
            dose_unit: DoseUnit::Mcg,
            syringe_capacity_ml: DEFAULT_SYRINGE_ML,
            frequency: None,
            unit_error: None,
        }
    }
}

impl CalculatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete input, or the first field still left blank.
    pub fn to_input(&self) -> Result<ReconstitutionInput, InputField> {
        Ok(ReconstitutionInput {
            peptide_mass_mg: self.peptide_mass_mg.ok_or(InputField::PeptideMassMg)?,
            diluent_volume_ml: self.diluent_volume_ml.ok_or(InputField::DiluentVolumeMl)?,
            desired_dose: self.desired_dose.ok_or(InputField::DesiredDose)?,
            dose_unit: self.dose_unit,
            syringe_capacity_ml: self.syringe_capacity_ml,
            doses_per_day: self.frequency.map(DosingFrequency::doses_per_day),
        })
    }

    /// Presentation for the current form contents.
    pub fn present(&self) -> Presentation {
        if let Some(e) = &self.unit_error {
            return Presentation::placeholder(e.to_string());
        }
        match self.to_input() {
            Ok(input) => Presentation::from(logic::calculate(&input)),
            Err(field) => Presentation::placeholder(format!("enter the {}", field)),
        }
    }

    /// Apply one edit and return what the calculator now shows.
    pub fn apply(&mut self, edit: &InputEdit) -> Presentation {
        match edit {
            InputEdit::SetPeptideMass(mg) => self.peptide_mass_mg = Some(*mg),
            InputEdit::SetDiluent(ml) => self.diluent_volume_ml = Some(*ml),
            InputEdit::SetDose(dose) => self.desired_dose = Some(*dose),
            InputEdit::SetDoseUnit(raw) => match raw.parse::<DoseUnit>() {
                Ok(unit) => {
                    self.dose_unit = unit;
                    self.unit_error = None;
                }
                Err(e) => self.unit_error = Some(e),
            },
            InputEdit::SetSyringe(ml) => self.syringe_capacity_ml = *ml,
            InputEdit::SetFrequency(freq) => self.frequency = Some(*freq),
            InputEdit::ClearFrequency => self.frequency = None,
            InputEdit::Clear(field) => self.clear(*field),
        }

        let presentation = self.present();
        debug!(%edit, ready = presentation.is_ready(), "calculator edit applied");
        presentation
    }

    fn clear(&mut self, field: InputField) {
        match field {
            InputField::PeptideMassMg => self.peptide_mass_mg = None,
            InputField::DiluentVolumeMl => self.diluent_volume_ml = None,
            InputField::DesiredDose => self.desired_dose = None,
            InputField::DosesPerDay => self.frequency = None,
            InputField::SyringeCapacityMl => self.syringe_capacity_ml = DEFAULT_SYRINGE_ML,
        }
    }
}

/// Replay a sequence of edits against `session`.
/// Returns the sequence of (edit, resulting presentation) pairs.
pub fn replay_edits(
    mut session: CalculatorSession,
    edits: &[InputEdit],
) -> Vec<(InputEdit, Presentation)> {
    edits
        .iter()
        .map(|edit| (edit.clone(), session.apply(edit)))
        .collect()
}
