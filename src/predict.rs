//! Forward projection of the weight series toward the goal.

use chrono::NaiveDate;

use crate::domain::Origin;
use crate::error::ModelError;
use crate::formulas::{DAYS_PER_WEEK, GOAL_EPSILON, dampened_rate};
use crate::series::Series;
use crate::smoothing::SmoothedSeries;

/// Default number of consecutive converged days that ends the projection.
pub const DEFAULT_TAIL: usize = 30;

/// Default cap on projected days (about ten years).
pub const DEFAULT_MAX_DAYS: usize = 3650;

/// Parameters for the projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionParams {
    pub goal: f64,
    /// Target weekly rate magnitude. Must be positive.
    pub rate: f64,
    /// Consecutive days within `epsilon` of the goal required to stop.
    pub tail: usize,
    /// Hard cap on projected days.
    pub max_days: usize,
    pub epsilon: f64,
}

impl PredictionParams {
    /// Creates parameters with the default tail, cap and epsilon.
    pub fn new(goal: f64, rate: f64) -> Self {
        Self {
            goal,
            rate,
            tail: DEFAULT_TAIL,
            max_days: DEFAULT_MAX_DAYS,
            epsilon: GOAL_EPSILON,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(ModelError::InvalidRate(self.rate));
        }
        if self.tail == 0 {
            return Err(ModelError::InvalidTail);
        }
        Ok(())
    }
}

/// Extends the series past its last entry until the projection has stayed
/// within `epsilon` of the goal for `tail` consecutive days.
///
/// Each projected day is `prev + dampened(prev, goal, rate) / 7`, starting
/// from the smoothed level of the last existing day. Previously predicted
/// entries are discarded first, so repeated runs give identical tails.
///
/// Returns the number of predicted days. If the cap is hit the series is left
/// without predictions and [`ModelError::NonConvergent`] is returned.
pub fn predict(
    series: &mut Series,
    smoothed: &SmoothedSeries,
    params: &PredictionParams,
) -> Result<usize, ModelError> {
    params.validate()?;
    series.clear_predicted();

    let anchor = series.last().ok_or(ModelError::InsufficientData)?;
    let mut prev = smoothed
        .level(anchor)
        .or_else(|| series.value_at(anchor))
        .ok_or(ModelError::InsufficientData)?;

    let mut date = anchor;
    let mut streak = 0;

    for day in 1..=params.max_days {
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };

        let value = prev + dampened_rate(prev, params.goal, params.rate) / DAYS_PER_WEEK;
        series.insert(date, value, Origin::Predicted);

        if (value - params.goal).abs() < params.epsilon {
            streak += 1;
        } else {
            streak = 0;
        }

        if streak == params.tail {
            log::debug!(
                "Projected {} days from {} (goal {} reached around {})",
                day,
                anchor,
                params.goal,
                date - chrono::Duration::days(params.tail as i64 - 1)
            );
            return Ok(day);
        }

        prev = value;
    }

    series.clear_predicted();
    log::warn!(
        "Projection toward {} did not converge within {} days",
        params.goal,
        params.max_days
    );
    Err(ModelError::NonConvergent {
        goal: params.goal,
        max_days: params.max_days,
    })
}

/// First predicted date within `epsilon` of the goal.
pub fn goal_date(series: &Series, goal: f64, epsilon: f64) -> Option<NaiveDate> {
    series
        .iter()
        .find(|(_, e)| e.origin == Origin::Predicted && (e.value - goal).abs() < epsilon)
        .map(|(d, _)| d)
}
