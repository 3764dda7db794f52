use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reconstitution_calc::config::{self, SweepConfig};
use reconstitution_calc::presentation::DisplayResult;
use reconstitution_calc::{
    calculate, sweep, ConfigError, DoseUnit, DosingFrequency, ReconstitutionInput, ValidationError,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Peptide reconstitution and dosage calculator")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate draw volume and syringe units for one vial.
    Calc(CalcArgs),
    /// Check the calculation invariants over randomly sampled inputs.
    Sweep {
        #[arg(long)]
        samples: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(clap::Args, Debug)]
struct CalcArgs {
    /// Peptide in the vial, mg
    #[arg(long, required_unless_present = "from_json")]
    mass: Option<f64>,
    /// Diluent added, mL
    #[arg(long, required_unless_present = "from_json")]
    diluent: Option<f64>,
    /// Desired dose, in --unit
    #[arg(long, required_unless_present = "from_json")]
    dose: Option<f64>,
    #[arg(long, default_value = "mcg")]
    unit: String,
    /// Syringe capacity, mL (0.3, 0.5 or 1.0)
    #[arg(long, default_value_t = 1.0)]
    syringe: f64,
    #[arg(long, conflicts_with = "frequency")]
    doses_per_day: Option<f64>,
    #[arg(long, value_enum)]
    frequency: Option<Frequency>,
    /// Read the input record from a JSON file instead of flags
    #[arg(
        long,
        conflicts_with_all = ["mass", "diluent", "dose", "unit", "syringe", "doses_per_day", "frequency"]
    )]
    from_json: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Frequency {
    Daily,
    TwiceDaily,
    EveryOtherDay,
    ThreeTimesWeekly,
    FiveOnTwoOff,
    Weekly,
}

impl From<Frequency> for DosingFrequency {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Daily => DosingFrequency::OnceDaily,
            Frequency::TwiceDaily => DosingFrequency::TwiceDaily,
            Frequency::EveryOtherDay => DosingFrequency::EveryOtherDay,
            Frequency::ThreeTimesWeekly => DosingFrequency::ThreeTimesWeekly,
            Frequency::FiveOnTwoOff => DosingFrequency::FiveOnTwoOff,
            Frequency::Weekly => DosingFrequency::Weekly,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("missing --{0}")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sweep found a violation")]
    SweepFailed,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config::log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let outcome = match args.command {
        Command::Calc(calc) => run_calc(calc),
        Command::Sweep { samples, seed } => run_sweep(samples, seed),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(args: &CalcArgs) -> Result<ReconstitutionInput, CliError> {
    if let Some(path) = &args.from_json {
        let raw = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&raw)?);
    }

    let doses_per_day = args
        .frequency
        .map(|freq| DosingFrequency::from(freq).doses_per_day())
        .or(args.doses_per_day);

    Ok(ReconstitutionInput {
        peptide_mass_mg: args.mass.ok_or(CliError::MissingArgument("mass"))?,
        diluent_volume_ml: args.diluent.ok_or(CliError::MissingArgument("diluent"))?,
        desired_dose: args.dose.ok_or(CliError::MissingArgument("dose"))?,
        dose_unit: args.unit.parse::<DoseUnit>()?,
        syringe_capacity_ml: args.syringe,
        doses_per_day,
    })
}

fn run_calc(args: CalcArgs) -> Result<(), CliError> {
    let input = read_input(&args)?;
    let result = calculate(&input)?;
    let display = DisplayResult::from(&result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&display)?);
    } else {
        println!("Input:\n{}\n", input);
        println!("Result:\n{}", display);
    }
    Ok(())
}

fn run_sweep(samples: Option<usize>, seed: Option<u64>) -> Result<(), CliError> {
    let env_config = SweepConfig::from_env()?;
    let samples = samples.unwrap_or(env_config.samples);
    let seed = seed.unwrap_or(env_config.seed);

    info!("Checking invariants:");
    for (name, _) in reconstitution_calc::invariants::ALL_INVARIANTS {
        info!("  - {}", name);
    }

    let result = sweep::run_sweep(samples, seed);
    println!("{}", result);

    if result.violation.is_some() {
        return Err(CliError::SweepFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_rejects_input_flags() {
        for flag in [["--unit", "mg"], ["--syringe", "0.5"], ["--frequency", "daily"], ["--doses-per-day", "2"]] {
            let parsed = Args::try_parse_from(["recon-calc", "calc", "--from-json", "vial.json", flag[0], flag[1]]);
            assert!(parsed.is_err(), "{} accepted alongside --from-json", flag[0]);
        }
    }

    #[test]
    fn test_from_json_alone_parses() {
        let args = Args::try_parse_from(["recon-calc", "calc", "--from-json", "vial.json", "--json"]).unwrap();
        match args.command {
            Command::Calc(calc) => {
                assert_eq!(calc.from_json, Some(PathBuf::from("vial.json")));
                assert!(calc.json);
            }
            Command::Sweep { .. } => panic!("expected calc"),
        }
    }

    #[test]
    fn test_flags_without_from_json_parse() {
        let args = Args::try_parse_from([
            "recon-calc", "calc", "--mass", "5", "--diluent", "2", "--dose", "250", "--unit", "mcg",
        ])
        .unwrap();
        let Command::Calc(calc) = args.command else {
            panic!("expected calc");
        };
        assert_eq!(read_input(&calc).unwrap().peptide_mass_mg, 5.0);
    }
}
