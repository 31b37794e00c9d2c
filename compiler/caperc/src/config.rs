//! Options for the `run` command.

use std::fmt;

use caper_eval::DEFAULT_SEED;

/// Settings for one demo run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub demo: String,
    /// Upper bound on simulated ticks.
    pub ticks: u32,
    /// Budget handed to the program on every tick.
    pub budget: f64,
    pub seed: u64,
    /// Print execution counters to stderr when the run ends.
    pub profile: bool,
}

impl RunConfig {
    pub const DEFAULT_TICKS: u32 = 200;
    pub const DEFAULT_BUDGET: f64 = 4.0;

    pub fn new(demo: impl Into<String>) -> Self {
        RunConfig {
            demo: demo.into(),
            ticks: Self::DEFAULT_TICKS,
            budget: Self::DEFAULT_BUDGET,
            seed: DEFAULT_SEED,
            profile: false,
        }
    }

    /// Parse the arguments that follow `run`.
    ///
    /// The first non-flag argument names the demo; flags may come before or
    /// after it.
    pub fn parse(args: &[String]) -> Result<Self, ConfigError> {
        let mut demo = None;
        let mut ticks = Self::DEFAULT_TICKS;
        let mut budget = Self::DEFAULT_BUDGET;
        let mut seed = DEFAULT_SEED;
        let mut profile = false;

        for arg in args {
            if let Some(value) = arg.strip_prefix("--ticks=") {
                ticks = parse_value("--ticks", value)?;
            } else if let Some(value) = arg.strip_prefix("--budget=") {
                budget = parse_value("--budget", value)?;
                if !budget.is_finite() || budget < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        flag: "--budget",
                        value: value.to_string(),
                    });
                }
            } else if let Some(value) = arg.strip_prefix("--seed=") {
                seed = parse_value("--seed", value)?;
            } else if arg == "--profile" {
                profile = true;
            } else if arg.starts_with('-') {
                return Err(ConfigError::UnknownFlag(arg.clone()));
            } else if demo.is_none() {
                demo = Some(arg.clone());
            } else {
                return Err(ConfigError::UnexpectedArgument(arg.clone()));
            }
        }

        let demo = demo.ok_or(ConfigError::MissingDemo)?;
        Ok(RunConfig {
            demo,
            ticks,
            budget,
            seed,
            profile,
        })
    }
}

fn parse_value<T: std::str::FromStr>(flag: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}

/// A malformed `run` command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingDemo,
    UnknownFlag(String),
    UnexpectedArgument(String),
    InvalidValue { flag: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingDemo => write!(f, "missing demo name"),
            ConfigError::UnknownFlag(flag) => write!(f, "unknown option '{flag}'"),
            ConfigError::UnexpectedArgument(arg) => write!(f, "unexpected argument '{arg}'"),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value '{value}' for {flag}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
