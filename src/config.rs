// Config — sweep defaults and log filter from the environment.

use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::error::ConfigError;

pub const SAMPLES_KEY: &str = "RECON_SWEEP_SAMPLES";
pub const SEED_KEY: &str = "RECON_SWEEP_SEED";
pub const LOG_KEY: &str = "RECON_LOG";

pub const DEFAULT_SAMPLES: usize = 10000;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug)]
pub struct SweepConfig {
    pub samples: usize,
    pub seed: u64,
}

impl SweepConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(env::var(SAMPLES_KEY).ok(), env::var(SEED_KEY).ok())
    }

    /// Build from raw setting values, `None` meaning unset.
    pub fn from_values(samples: Option<String>, seed: Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            samples: parse_setting(SAMPLES_KEY, samples)?.unwrap_or(DEFAULT_SAMPLES),
            seed: parse_setting(SEED_KEY, seed)?.unwrap_or_else(clock_seed),
        })
    }
}

/// Log filter directive, from `RECON_LOG` or the default.
pub fn log_filter() -> String {
    log_filter_from(env::var(LOG_KEY).ok())
}

fn log_filter_from(raw: Option<String>) -> String {
    raw.filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Parse one setting; unset is `Ok(None)`, malformed is a `ConfigError`.
pub fn parse_setting<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigError>
where
    T::Err: Display,
{
    let Some(raw) = raw else {
        info!("{key} not set, using default");
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
