//! Error types for the energymodel application.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur when parsing the weight and intake logs.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read file: {0}")]
    CannotRead(String),

    #[error("cannot write file: {0}")]
    CannotWrite(String),

    #[error("missing {field} in line {line}")]
    MissingField { line: usize, field: &'static str },

    #[error("invalid date format in line {line}: {value}")]
    InvalidDate { line: usize, value: String },

    #[error("invalid weight value in line {line}: {value}")]
    InvalidWeight { line: usize, value: String },

    #[error("invalid energy value in line {line}: {value}")]
    InvalidKcal { line: usize, value: String },

    #[error("invalid energy term: {0}")]
    InvalidEnergyTerm(String),

    #[error("energy term cannot be zero")]
    ZeroEnergy,
}

/// Errors raised by the model pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("insufficient data: at least one weight observation is required")]
    InsufficientData,

    #[error("duplicate weight observation for {0}")]
    DuplicateDate(NaiveDate),

    #[error("rate must be positive and finite: {0}")]
    InvalidRate(f64),

    #[error("smoothing constant {name} must lie in (0, 1]: {value}")]
    InvalidSmoothing { name: &'static str, value: f64 },

    #[error("convergence tail must be at least one day")]
    InvalidTail,

    #[error("adaptation window must be at least one day")]
    InvalidAdaptation,

    #[error("prediction did not reach goal {goal} within {max_days} days")]
    NonConvergent { goal: f64, max_days: usize },
}

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    CannotRead(String),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no goal weight configured (set `goal` in the config file or pass --goal)")]
    MissingGoal,

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
