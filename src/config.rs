//! Settings file support.
//!
//! Settings live in `config.toml` inside the data directory. Every key has a
//! typed default except `goal`, which must be set in the file or on the
//! command line.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::analysis::{DEFAULT_MAX_GAP_DAYS, ModelConfig};
use crate::error::ConfigError;
use crate::predict::{DEFAULT_MAX_DAYS, DEFAULT_TAIL};
use crate::smoothing::SmoothingParams;
use crate::tdee::{BudgetParams, DEFAULT_BASELINE_ALPHA};

/// File names inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";
pub const WEIGHT_FILE: &str = "weight";
pub const INPUT_FILE: &str = "input";

/// Documented settings: key, description, default.
pub const OPTIONS: &[(&str, &str, Option<&str>)] = &[
    ("rate", "how much weight you want to lose per week", Some("0.5")),
    ("goal", "your target weight", None),
    ("unit", "your desired base unit in kcal", Some("1")),
    ("start_date", "the first day that should be considered [yyyy-mm-dd]", None),
    ("balance_start", "the day from which on an energy balance is kept [yyyy-mm-dd]", None),
    ("balance_factor", "how many money units you pay per energy unit", Some("0.01")),
    ("alpha", "level smoothing constant of the weight trend", Some("0.1")),
    ("beta", "trend smoothing constant of the weight trend", Some("0.1")),
    ("tail", "days the projection must stay at the goal", Some("30")),
    ("max_prediction_days", "longest projection before giving up", Some("3650")),
    ("baseline_alpha", "how fast the expenditure estimate follows new evidence", Some("0.05")),
    ("warmup_days", "days before the expenditure estimate starts adapting", Some("0")),
    ("adapt_every", "length of each expenditure adaptation window in days", Some("1")),
    ("max_gap_days", "a gap this long (days) starts a new analysis window", Some("30")),
];

/// User settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default)]
    pub goal: Option<f64>,
    #[serde(default = "default_unit")]
    pub unit: f64,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub balance_start: Option<NaiveDate>,
    #[serde(default = "default_balance_factor")]
    pub balance_factor: f64,
    #[serde(default = "default_smoothing")]
    pub alpha: f64,
    #[serde(default = "default_smoothing")]
    pub beta: f64,
    #[serde(default = "default_tail")]
    pub tail: usize,
    #[serde(default = "default_max_prediction_days")]
    pub max_prediction_days: usize,
    #[serde(default = "default_baseline_alpha")]
    pub baseline_alpha: f64,
    #[serde(default)]
    pub warmup_days: u32,
    #[serde(default = "default_adapt_every")]
    pub adapt_every: u32,
    #[serde(default = "default_max_gap_days")]
    pub max_gap_days: i64,
}

fn default_rate() -> f64 {
    0.5
}

fn default_unit() -> f64 {
    1.0
}

fn default_balance_factor() -> f64 {
    0.01
}

fn default_smoothing() -> f64 {
    0.1
}

fn default_tail() -> usize {
    DEFAULT_TAIL
}

fn default_max_prediction_days() -> usize {
    DEFAULT_MAX_DAYS
}

fn default_baseline_alpha() -> f64 {
    DEFAULT_BASELINE_ALPHA
}

fn default_adapt_every() -> u32 {
    1
}

fn default_max_gap_days() -> i64 {
    DEFAULT_MAX_GAP_DAYS
}

/// Accepts both bare TOML dates and quoted `yyyy-mm-dd` strings.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    let text = match value {
        None => return Ok(None),
        Some(toml::Value::Datetime(dt)) => dt.to_string(),
        Some(toml::Value::String(s)) => s,
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a date, found {}",
                other.type_str()
            )));
        }
    };
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("invalid date: {}", text)))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            goal: None,
            unit: default_unit(),
            start_date: None,
            balance_start: None,
            balance_factor: default_balance_factor(),
            alpha: default_smoothing(),
            beta: default_smoothing(),
            tail: default_tail(),
            max_prediction_days: default_max_prediction_days(),
            baseline_alpha: default_baseline_alpha(),
            warmup_days: 0,
            adapt_every: default_adapt_every(),
            max_gap_days: default_max_gap_days(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file. A missing file yields the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::CannotRead(format!("{}: {}", path.display(), e)))?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, rate: Option<f64>, goal: Option<f64>) -> Self {
        if let Some(rate) = rate {
            self.rate = rate;
        }
        if goal.is_some() {
            self.goal = goal;
        }
        self
    }

    /// Validates the settings and builds the model configuration.
    pub fn to_model_config(&self) -> Result<ModelConfig, ConfigError> {
        let goal = self.goal.ok_or(ConfigError::MissingGoal)?;
        if !goal.is_finite() || goal <= 0.0 {
            return Err(invalid("goal", format!("must be a positive weight, got {}", goal)));
        }
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(invalid("rate", format!("must be positive, got {}", self.rate)));
        }
        if !self.unit.is_finite() || self.unit <= 0.0 {
            return Err(invalid("unit", format!("must be positive, got {}", self.unit)));
        }
        if self.max_gap_days < 1 {
            return Err(invalid("max_gap_days", "must be at least 1".to_string()));
        }

        let smoothing = SmoothingParams::new(self.alpha, self.beta)
            .map_err(|e| invalid("alpha/beta", e.to_string()))?;
        let budget = BudgetParams {
            alpha: self.baseline_alpha,
            warmup_days: self.warmup_days,
            adapt_every: self.adapt_every,
        };
        budget
            .validate()
            .map_err(|e| invalid("baseline_alpha/adapt_every", e.to_string()))?;
        if self.tail == 0 {
            return Err(invalid("tail", "must be at least 1".to_string()));
        }

        Ok(ModelConfig {
            smoothing,
            tail: self.tail,
            max_prediction_days: self.max_prediction_days,
            budget,
            start_date: self.start_date,
            max_gap_days: self.max_gap_days,
            ..ModelConfig::new(goal, self.rate)
        })
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

/// Locations of the files a run reads and writes.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.energymodel`, or `.energymodel` if no home directory is known.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".energymodel"))
            .unwrap_or_else(|| PathBuf::from(".energymodel"))
    }

    pub fn config(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn weights(&self) -> PathBuf {
        self.dir.join(WEIGHT_FILE)
    }

    pub fn intake(&self) -> PathBuf {
        self.dir.join(INPUT_FILE)
    }
}
