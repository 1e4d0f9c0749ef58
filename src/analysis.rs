//! Pipeline orchestration.
//!
//! A [`Model`] is one run: it owns the weight series, its smoothed trend and
//! the baseline, all rebuilt from the raw logs in a single pass:
//!
//! ```text
//! truncate → interpolate → smooth → predict → smooth → baseline
//! ```
//!
//! Nothing is patched incrementally. A new observation means a new `Model`.

use chrono::{Duration, NaiveDate};

use crate::domain::{IntakeEntry, IntakeLog, WeightObservation};
use crate::error::ModelError;
use crate::formulas::{GOAL_EPSILON, KCAL_PER_KG};
use crate::interpolate::interpolate_gaps;
use crate::predict::{self, DEFAULT_MAX_DAYS, DEFAULT_TAIL, PredictionParams};
use crate::series::Series;
use crate::smoothing::{SmoothedSeries, SmoothingParams, smooth};
use crate::tdee::{self, BaselineSeries, BudgetParams};

/// Default gap (in days) that starts a new analysis window.
pub const DEFAULT_MAX_GAP_DAYS: i64 = 30;

/// Everything the pipeline needs besides the logs themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub goal: f64,
    /// Weekly rate magnitude in kg.
    pub rate: f64,
    pub smoothing: SmoothingParams,
    pub tail: usize,
    pub max_prediction_days: usize,
    pub budget: BudgetParams,
    /// First day considered, if the user set one.
    pub start_date: Option<NaiveDate>,
    pub max_gap_days: i64,
}

impl ModelConfig {
    /// Configuration with default tunables.
    pub fn new(goal: f64, rate: f64) -> Self {
        Self {
            goal,
            rate,
            smoothing: SmoothingParams::default(),
            tail: DEFAULT_TAIL,
            max_prediction_days: DEFAULT_MAX_DAYS,
            budget: BudgetParams::default(),
            start_date: None,
            max_gap_days: DEFAULT_MAX_GAP_DAYS,
        }
    }

    fn prediction_params(&self) -> PredictionParams {
        PredictionParams {
            tail: self.tail,
            max_days: self.max_prediction_days,
            ..PredictionParams::new(self.goal, self.rate)
        }
    }
}

/// Chooses the first date of the analysis window.
///
/// Stale data (no real observation within `max_gap_days` of today) starts
/// over at today. Otherwise a configured start date wins, then the end of
/// the most recent long gap, then the first observation.
pub fn analysis_cutoff(series: &Series, config: &ModelConfig, today: NaiveDate) -> NaiveDate {
    let (Some(first), Some(last_real)) = (series.first(), series.last_real()) else {
        return today;
    };
    if (today - last_real).num_days() > config.max_gap_days {
        return today;
    }

    match config.start_date {
        Some(start) => start.max(first),
        None => series
            .find_gap(config.max_gap_days)
            .map(|(_, after)| after)
            .unwrap_or(first),
    }
}

/// Fully computed state for one run.
#[derive(Debug, Clone)]
pub struct Model {
    config: ModelConfig,
    today: NaiveDate,
    series: Series,
    smoothed: SmoothedSeries,
    intake: IntakeLog,
    baseline: BaselineSeries,
    first: NaiveDate,
    last_real: NaiveDate,
    predicted_days: usize,
}

impl Model {
    /// Runs the whole pipeline over the given logs.
    ///
    /// Fails with [`ModelError::InsufficientData`] when no observation is left
    /// after truncation, and propagates duplicate dates, invalid parameters
    /// and non-convergent projections.
    pub fn build(
        weights: &[WeightObservation],
        intake: Vec<IntakeEntry>,
        config: &ModelConfig,
        today: NaiveDate,
    ) -> Result<Self, ModelError> {
        let mut series = Series::from_observations(weights)?;
        let mut intake = IntakeLog::from_entries(intake);

        let cutoff = analysis_cutoff(&series, config, today);
        series.truncate(cutoff);
        intake.truncate(cutoff);
        if series.is_empty() {
            return Err(ModelError::InsufficientData);
        }

        let first = series.first().ok_or(ModelError::InsufficientData)?;
        let last_real = series.last_real().ok_or(ModelError::InsufficientData)?;
        log::debug!(
            "Analysis window starts {} ({} observations, {} intake entries)",
            cutoff,
            series.len(),
            intake.len()
        );

        interpolate_gaps(&mut series);
        if let Some(observed) = series.range() {
            log::debug!("{} days between first and last observation", observed.len());
        }

        let trend = smooth(&series, config.smoothing, config.goal, config.rate)?;
        let predicted_days = predict::predict(&mut series, &trend, &config.prediction_params())?;
        // Give every projected day a level too
        let smoothed = smooth(&series, config.smoothing, config.goal, config.rate)?;

        let baseline = tdee::estimate_baseline(&series, &smoothed, &intake, today, &config.budget)?;

        log::info!(
            "Model built: {} to {} ({} projected days), baseline {:.0} kcal",
            first,
            last_real,
            predicted_days,
            baseline.current().unwrap_or_default()
        );

        Ok(Self {
            config: config.clone(),
            today,
            series,
            smoothed,
            intake,
            baseline,
            first,
            last_real,
            predicted_days,
        })
    }

    // === Accessors ===

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn smoothed(&self) -> &SmoothedSeries {
        &self.smoothed
    }

    pub fn intake(&self) -> &IntakeLog {
        &self.intake
    }

    pub fn baseline(&self) -> &BaselineSeries {
        &self.baseline
    }

    /// First day of the analysis window.
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last_real(&self) -> NaiveDate {
        self.last_real
    }

    pub fn predicted_days(&self) -> usize {
        self.predicted_days
    }

    // === Per-day queries ===

    /// Smoothed weight for a date. Dates past the projection use its end.
    pub fn level_at(&self, date: NaiveDate) -> Option<f64> {
        let last = self.smoothed.last()?;
        self.smoothed.level(date.min(last))
    }

    /// Signed weekly rate targeted on a date.
    pub fn rate_at(&self, date: NaiveDate) -> Option<f64> {
        tdee::rate_at(
            &self.series,
            &self.smoothed,
            date,
            self.config.goal,
            self.config.rate,
        )
    }

    /// Calorie allowance for a date.
    pub fn allowed_kcal(&self, date: NaiveDate) -> Option<f64> {
        tdee::allowed_kcal(&self.baseline, date, self.rate_at(date)?)
    }

    /// Allowance at an explicit weekly rate. A rate of zero is maintenance.
    pub fn allowed_kcal_at_rate(&self, date: NaiveDate, weekly_rate: f64) -> Option<f64> {
        tdee::allowed_kcal(&self.baseline, date, weekly_rate)
    }

    pub fn consumed_at(&self, date: NaiveDate) -> i64 {
        self.intake.consumed_at(date)
    }

    /// Allowance left for a date after its logged intake.
    pub fn remaining_at(&self, date: NaiveDate) -> Option<f64> {
        Some(self.allowed_kcal(date)? - self.consumed_at(date) as f64)
    }

    /// True if a weight was entered for today.
    pub fn has_weight_today(&self) -> bool {
        self.series.is_real(self.today)
    }

    // === Progress ===

    /// Smoothed weight lost between the first and the last observation.
    pub fn kg_lost(&self) -> Option<f64> {
        Some(self.smoothed.level(self.first)? - self.smoothed.level(self.last_real)?)
    }

    /// Smoothed weight today minus the goal.
    pub fn kg_to_go(&self) -> Option<f64> {
        Some(self.level_at(self.today)? - self.config.goal)
    }

    /// Share of the way to the goal already covered, in percent.
    pub fn progress_percent(&self) -> Option<f64> {
        let lost = self.kg_lost()?;
        let total = lost + self.kg_to_go()?;
        (total > 0.0).then(|| 100.0 * lost / total)
    }

    /// Estimated days until the goal at the configured rate.
    pub fn days_to_go(&self) -> Option<f64> {
        let kcal_to_burn = self.kg_to_go()? * KCAL_PER_KG;
        Some(kcal_to_burn.abs() / (self.config.rate * 1000.0))
    }

    /// First projected day at the goal.
    pub fn goal_date(&self) -> Option<NaiveDate> {
        predict::goal_date(&self.series, self.config.goal, GOAL_EPSILON)
    }

    /// Yesterday, but not before the analysis window.
    pub fn status_start(&self) -> NaiveDate {
        (self.today - Duration::days(1)).max(self.first)
    }
}
