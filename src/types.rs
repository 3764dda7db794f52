// Types — calculator inputs, results and the small enums they are built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CAPACITY_TOLERANCE_ML, MCG_PER_MG, SYRINGE_TABLE};
use crate::error::ValidationError;

/// Unit the desired dose is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DoseUnit {
    Mcg,
    Mg,
}

impl DoseUnit {
    /// Micrograms represented by one of this unit.
    pub fn mcg_factor(self) -> f64 {
        match self {
            DoseUnit::Mcg => 1.0,
            DoseUnit::Mg => MCG_PER_MG,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DoseUnit::Mcg => "mcg",
            DoseUnit::Mg => "mg",
        }
    }
}

impl FromStr for DoseUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcg" | "ug" | "µg" => Ok(DoseUnit::Mcg),
            "mg" => Ok(DoseUnit::Mg),
            other => Err(ValidationError::UnsupportedDoseUnit {
                unit: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for DoseUnit {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insulin-style syringe barrels the calculator knows the graduations of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyringeSize {
    /// 0.3 mL, 30 units
    ThirdCc,
    /// 0.5 mL, 50 units
    HalfCc,
    /// 1.0 mL, 100 units
    OneCc,
}

impl SyringeSize {
    fn table_entry(self) -> (f64, f64) {
        match self {
            SyringeSize::ThirdCc => SYRINGE_TABLE[0],
            SyringeSize::HalfCc => SYRINGE_TABLE[1],
            SyringeSize::OneCc => SYRINGE_TABLE[2],
        }
    }

    pub fn capacity_ml(self) -> f64 {
        self.table_entry().0
    }

    /// Number of unit graduations printed on the barrel.
    pub fn total_units(self) -> f64 {
        self.table_entry().1
    }
}

impl TryFrom<f64> for SyringeSize {
    type Error = ValidationError;

    fn try_from(capacity_ml: f64) -> Result<Self, Self::Error> {
        [SyringeSize::ThirdCc, SyringeSize::HalfCc, SyringeSize::OneCc]
            .into_iter()
            .find(|size| (size.capacity_ml() - capacity_ml).abs() <= CAPACITY_TOLERANCE_ML)
            .ok_or(ValidationError::UnsupportedSyringeSize { capacity_ml })
    }
}

impl fmt::Display for SyringeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mL ({} units)", self.capacity_ml(), self.total_units())
    }
}

/// Common dosing schedules, expressed as (possibly fractional) doses per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DosingFrequency {
    OnceDaily,
    TwiceDaily,
    EveryOtherDay,
    ThreeTimesWeekly,
    FiveOnTwoOff,
    Weekly,
    Custom(f64),
}

impl DosingFrequency {
    pub fn doses_per_day(self) -> f64 {
        match self {
            DosingFrequency::OnceDaily => 1.0,
            DosingFrequency::TwiceDaily => 2.0,
            DosingFrequency::EveryOtherDay => 1.0 / 2.0,
            DosingFrequency::ThreeTimesWeekly => 3.0 / 7.0,
            DosingFrequency::FiveOnTwoOff => 5.0 / 7.0,
            DosingFrequency::Weekly => 1.0 / 7.0,
            DosingFrequency::Custom(per_day) => per_day,
        }
    }
}

/// Names of the numeric input fields, used to say which one failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    PeptideMassMg,
    DiluentVolumeMl,
    DesiredDose,
    DosesPerDay,
    SyringeCapacityMl,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::PeptideMassMg => "peptide mass (mg)",
            InputField::DiluentVolumeMl => "diluent volume (mL)",
            InputField::DesiredDose => "desired dose",
            InputField::DosesPerDay => "doses per day",
            InputField::SyringeCapacityMl => "syringe capacity (mL)",
        };
        f.write_str(name)
    }
}

/// Everything needed to work out a draw volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstitutionInput {
    pub peptide_mass_mg: f64,
    pub diluent_volume_ml: f64,
    pub desired_dose: f64,
    pub dose_unit: DoseUnit,
    pub syringe_capacity_ml: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doses_per_day: Option<f64>,
}

/// Unrounded output of a calculation. Round with `presentation::DisplayResult`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstitutionResult {
    pub concentration_mcg_per_ml: f64,
    pub concentration_mg_per_ml: f64,
    pub draw_volume_ml: f64,
    pub syringe_units_to_draw: f64,
    pub total_doses_per_vial: f64,
    pub days_of_supply: Option<f64>,
    pub volume_too_small: bool,
    pub volume_exceeds_syringe: bool,
}

impl fmt::Display for ReconstitutionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  peptide_mass:         {} mg", self.peptide_mass_mg)?;
        writeln!(f, "  diluent_volume:       {} mL", self.diluent_volume_ml)?;
        writeln!(f, "  desired_dose:         {} {}", self.desired_dose, self.dose_unit)?;
        write!(f, "  syringe_capacity:     {} mL", self.syringe_capacity_ml)?;
        if let Some(per_day) = self.doses_per_day {
            write!(f, "\n  doses_per_day:        {}", per_day)?;
        }
        Ok(())
    }
}
