// Peptide reconstitution and dosage calculator.
// `logic::calculate` turns a vial's peptide mass, the diluent volume, a
// target dose and a syringe size into the draw volume and syringe reading
// that deliver that dose, along with how many doses the vial holds.
// Results are unrounded; display rounding lives in `presentation`.

pub mod config;
pub mod constants;
pub mod error;
pub mod invariants;
pub mod logic;
pub mod presentation;
pub mod session;
pub mod sweep;
pub mod types;

pub use error::{ConfigError, ValidationError};
pub use logic::calculate;
pub use types::{DoseUnit, DosingFrequency, InputField, ReconstitutionInput, ReconstitutionResult, SyringeSize};
