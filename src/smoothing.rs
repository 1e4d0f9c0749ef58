//! Trend-aware (double exponential) smoothing of the weight series.
//!
//! ```text
//! level[d] = α × value[d] + (1 - α) × (level[d-1] + trend[d-1])
//! trend[d] = β × (level[d] - level[d-1]) + (1 - β) × trend[d-1]
//! ```
//!
//! The first day is seeded with its own value and with the target rate of
//! change (dampened toward the goal) converted to a daily trend. Every level
//! depends on all earlier ones, so the series is always recomputed whole.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ModelError;
use crate::formulas::{DAYS_PER_WEEK, dampened_rate};
use crate::series::Series;

/// Smoothing constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Weight of the new value in the level update.
    pub alpha: f64,
    /// Weight of the new level difference in the trend update.
    pub beta: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.1,
        }
    }
}

impl SmoothingParams {
    /// Creates parameters, rejecting constants outside `(0, 1]`.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, ModelError> {
        let params = Self { alpha, beta };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ModelError::InvalidSmoothing { name, value });
            }
        }
        Ok(())
    }
}

/// Smoothed state for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedPoint {
    /// Denoised weight.
    pub level: f64,
    /// Daily rate of change.
    pub trend: f64,
}

/// One smoothed point per day of the series domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothedSeries {
    points: BTreeMap<NaiveDate, SmoothedPoint>,
}

impl SmoothedSeries {
    /// Smoothed weight ("moving average") for a date.
    pub fn level(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).map(|p| p.level)
    }

    pub fn trend(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).map(|p| p.trend)
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.points.keys().next_back().copied()
    }
}

/// Smooths the whole series domain `[first, last]`.
///
/// `goal` and `rate` seed the initial trend. Fails with
/// [`ModelError::InsufficientData`] on an empty series.
pub fn smooth(
    series: &Series,
    params: SmoothingParams,
    goal: f64,
    rate: f64,
) -> Result<SmoothedSeries, ModelError> {
    params.validate()?;

    let range = series.range().ok_or(ModelError::InsufficientData)?;
    let first_value = series
        .value_at(range.start)
        .ok_or(ModelError::InsufficientData)?;

    let SmoothingParams { alpha, beta } = params;
    let mut points = BTreeMap::new();
    let mut level = first_value;
    let mut trend = dampened_rate(first_value, goal, rate) / DAYS_PER_WEEK;
    points.insert(range.start, SmoothedPoint { level, trend });

    for d in range.days().skip(1) {
        let previous = level;
        let forecast = previous + trend;
        // A hole in the domain contributes its forecast, i.e. no new evidence
        let value = series.value_at(d).unwrap_or(forecast);

        level = alpha * value + (1.0 - alpha) * forecast;
        trend = beta * (level - previous) + (1.0 - beta) * trend;
        points.insert(d, SmoothedPoint { level, trend });
    }

    log::debug!(
        "Smoothed {} days ({} to {})",
        points.len(),
        range.start,
        range.end
    );

    Ok(SmoothedSeries { points })
}
