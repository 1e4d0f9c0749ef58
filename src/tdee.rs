//! Self-calibrating daily energy budget.
//!
//! The maintenance expenditure ("baseline") starts from a generic estimate
//! and is corrected day by day from logged intake and the change of the
//! smoothed weight: eating `intake` while the trend drops by `loss` kg means
//! the body burned about `intake + loss × 7000` kcal. That evidence is
//! blended into the running estimate with a small weight, so the allowance
//! follows the user's real metabolism over time.
//!
//! Days without any intake entries are treated as missing, not as fasting,
//! and leave the estimate untouched. A genuine zero-intake day cannot be
//! represented.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{DateRange, IntakeLog};
use crate::error::ModelError;
use crate::formulas::{KCAL_PER_KG, dampened_rate, seed_baseline, weekly_rate_to_kcal};
use crate::series::Series;
use crate::smoothing::SmoothedSeries;

// === Constants ===

/// Weight of each new estimate in the baseline update.
pub const DEFAULT_BASELINE_ALPHA: f64 = 0.05;

// === Data Structures ===

/// Parameters for baseline adaptation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetParams {
    /// Weight of new evidence (0.05 = 5% per adaptation).
    pub alpha: f64,
    /// Days after the first observation during which the seed is kept.
    pub warmup_days: u32,
    /// Length of each adaptation window in days.
    pub adapt_every: u32,
}

impl Default for BudgetParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_BASELINE_ALPHA,
            warmup_days: 0,
            adapt_every: 1,
        }
    }
}

impl BudgetParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(ModelError::InvalidSmoothing {
                name: "baseline_alpha",
                value: self.alpha,
            });
        }
        if self.adapt_every == 0 {
            return Err(ModelError::InvalidAdaptation);
        }
        Ok(())
    }
}

/// Estimated maintenance expenditure per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaselineSeries {
    values: BTreeMap<NaiveDate, f64>,
    /// Number of days on which the estimate was updated from evidence.
    pub adaptations: usize,
}

impl BaselineSeries {
    /// Baseline for a date. Dates past the end use the final value.
    pub fn at(&self, date: NaiveDate) -> Option<f64> {
        if let Some(v) = self.values.get(&date) {
            return Some(*v);
        }
        let (last_date, last_value) = self.values.iter().next_back()?;
        (date > *last_date).then_some(*last_value)
    }

    /// Most recent estimate.
    pub fn current(&self) -> Option<f64> {
        self.values.values().next_back().copied()
    }
}

// === Main Calculation Functions ===

/// Computes the baseline for every date from the first observation to
/// `max(last, today)`.
///
/// On day `d` the estimate is updated from the window `[d - w, d - 1]`
/// (`w = adapt_every`) when `(d - first)` is a multiple of `w`, the warm-up
/// has passed, and at least one day in the window has logged intake:
///
/// ```text
/// implied     = mean logged intake + (level[d-w] - level[d]) / w × 7000
/// baseline[d] = α × implied + (1 - α) × baseline[d-1]
/// ```
///
/// Otherwise the previous value carries forward. Past the last series date
/// the baseline stays flat.
pub fn estimate_baseline(
    series: &Series,
    smoothed: &SmoothedSeries,
    intake: &IntakeLog,
    today: NaiveDate,
    params: &BudgetParams,
) -> Result<BaselineSeries, ModelError> {
    params.validate()?;

    let first = series.first().ok_or(ModelError::InsufficientData)?;
    let last = series.last().ok_or(ModelError::InsufficientData)?;
    let first_weight = series.value_at(first).ok_or(ModelError::InsufficientData)?;

    let window = params.adapt_every as i64;
    let mut values = BTreeMap::new();
    let mut adaptations = 0;
    let mut baseline = seed_baseline(first_weight);
    values.insert(first, baseline);

    let Some(range) = first.succ_opt().and_then(|start| DateRange::new(start, last.max(today)))
    else {
        return Ok(BaselineSeries {
            values,
            adaptations,
        });
    };

    for d in range.days() {
        let offset = (d - first).num_days();
        let adapt = d <= last && offset > params.warmup_days as i64 && offset % window == 0;

        if adapt
            && let Some(implied) = implied_expenditure(smoothed, intake, d, window)
        {
            baseline = params.alpha * implied + (1.0 - params.alpha) * baseline;
            adaptations += 1;
        }

        values.insert(d, baseline);
    }

    log::debug!(
        "Baseline from {} to {}: {} adaptations, final {:.0} kcal",
        first,
        last.max(today),
        adaptations,
        baseline
    );

    Ok(BaselineSeries {
        values,
        adaptations,
    })
}

/// Expenditure implied by the window ending the day before `date`, or `None`
/// if nothing was logged in it.
fn implied_expenditure(
    smoothed: &SmoothedSeries,
    intake: &IntakeLog,
    date: NaiveDate,
    window: i64,
) -> Option<f64> {
    let start = date - Duration::days(window);
    let logged: Vec<i64> = (0..window)
        .map(|i| intake.consumed_at(start + Duration::days(i)))
        .filter(|kcal| *kcal != 0)
        .collect();

    if logged.is_empty() {
        return None;
    }

    let avg_intake = logged.iter().sum::<i64>() as f64 / logged.len() as f64;
    let daily_loss = (smoothed.level(start)? - smoothed.level(date)?) / window as f64;

    Some(avg_intake + daily_loss * KCAL_PER_KG)
}

/// Signed weekly rate targeted on a date.
///
/// Up to the last real observation the smoothed level is used; afterwards the
/// projected value. Dates past the series end use its last day.
pub fn rate_at(
    series: &Series,
    smoothed: &SmoothedSeries,
    date: NaiveDate,
    goal: f64,
    rate: f64,
) -> Option<f64> {
    let date = date.min(series.last()?);
    let value = match series.last_real() {
        Some(last_real) if date <= last_real => smoothed.level(date)?,
        _ => series.value_at(date)?,
    };
    Some(dampened_rate(value, goal, rate))
}

/// Allowed intake for a date at a given signed weekly rate.
pub fn allowed_kcal(baseline: &BaselineSeries, date: NaiveDate, weekly_rate: f64) -> Option<f64> {
    Some(baseline.at(date)? + weekly_rate_to_kcal(weekly_rate))
}

// === Unit Tests ===

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IntakeEntry, WeightObservation};
    use crate::interpolate::interpolate_gaps;
    use crate::smoothing::{SmoothingParams, smooth};

    /// Helper to create a date.
    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn setup(weights: &[(NaiveDate, f64)]) -> (Series, SmoothedSeries) {
        let obs: Vec<WeightObservation> = weights
            .iter()
            .map(|(d, v)| WeightObservation::new(*d, *v))
            .collect();
        let mut series = Series::from_observations(&obs).unwrap();
        interpolate_gaps(&mut series);
        let smoothed = smooth(&series, SmoothingParams::default(), 80.0, 0.5).unwrap();
        (series, smoothed)
    }

    fn daily(start: NaiveDate, values: &[f64]) -> Vec<(NaiveDate, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (start + Duration::days(i as i64), *v))
            .collect()
    }

    #[test]
    fn test_seed() {
        let (series, smoothed) = setup(&[(date(2024, 1, 1), 90.0)]);
        let baseline = estimate_baseline(
            &series,
            &smoothed,
            &IntakeLog::default(),
            date(2024, 1, 1),
            &BudgetParams::default(),
        )
        .unwrap();

        assert!(approx_eq(baseline.at(date(2024, 1, 1)).unwrap(), 2700.0, 1e-9));
        assert_eq!(baseline.at(date(2023, 12, 31)), None);
        assert_eq!(baseline.adaptations, 0);
    }

    #[test]
    fn test_missing_intake_carries_forward() {
        let (series, smoothed) = setup(&daily(date(2024, 1, 1), &[90.0, 89.8, 89.9, 89.5]));
        let intake = IntakeLog::from_entries(vec![IntakeEntry::new(date(2024, 1, 2), 2000, "x")]);
        let baseline = estimate_baseline(
            &series,
            &smoothed,
            &intake,
            date(2024, 1, 4),
            &BudgetParams::default(),
        )
        .unwrap();

        // Nothing logged on Jan 1 → Jan 2 keeps the seed
        assert_eq!(
            baseline.at(date(2024, 1, 2)),
            baseline.at(date(2024, 1, 1))
        );
        // Logged on Jan 2 → Jan 3 adapts
        assert_ne!(
            baseline.at(date(2024, 1, 3)),
            baseline.at(date(2024, 1, 2))
        );
        // Nothing logged on Jan 3 → Jan 4 keeps Jan 3
        assert_eq!(
            baseline.at(date(2024, 1, 4)),
            baseline.at(date(2024, 1, 3))
        );
        assert_eq!(baseline.adaptations, 1);
    }

    #[test]
    fn test_single_update_matches_formula() {
        let (series, smoothed) = setup(&daily(date(2024, 1, 1), &[90.0, 89.5]));
        let intake = IntakeLog::from_entries(vec![
            IntakeEntry::new(date(2024, 1, 1), 1500, "Lunch"),
            IntakeEntry::new(date(2024, 1, 1), 500, "Dinner"),
        ]);
        let baseline = estimate_baseline(
            &series,
            &smoothed,
            &intake,
            date(2024, 1, 2),
            &BudgetParams::default(),
        )
        .unwrap();

        let loss =
            smoothed.level(date(2024, 1, 1)).unwrap() - smoothed.level(date(2024, 1, 2)).unwrap();
        let implied = 2000.0 + loss * 7000.0;
        let expected = 0.05 * implied + (1.0 - 0.05) * 2700.0;
        assert!(approx_eq(baseline.at(date(2024, 1, 2)).unwrap(), expected, 1e-9));
    }

    #[test]
    fn test_flat_after_last() {
        let (series, smoothed) = setup(&daily(date(2024, 1, 1), &[90.0, 89.5]));
        let intake = IntakeLog::from_entries(vec![
            IntakeEntry::new(date(2024, 1, 1), 2000, "x"),
            IntakeEntry::new(date(2024, 1, 2), 2000, "x"),
            IntakeEntry::new(date(2024, 1, 5), 2000, "x"),
        ]);
        let baseline = estimate_baseline(
            &series,
            &smoothed,
            &intake,
            date(2024, 1, 10),
            &BudgetParams::default(),
        )
        .unwrap();

        let end_of_data = baseline.at(date(2024, 1, 2)).unwrap();
        for day in 3..=10 {
            assert_eq!(baseline.at(date(2024, 1, day)), Some(end_of_data));
        }
        // Beyond the computed range clamps to the final value
        assert_eq!(baseline.at(date(2024, 2, 1)), Some(end_of_data));
        assert_eq!(baseline.at(date(2023, 12, 31)), None);
    }

    #[test]
    fn test_self_correcting_upward() {
        // Eating 3000 kcal while losing 0.5 kg/week: true burn ≈ 3500 kcal,
        // far above the 2700 seed, so the estimate should rise toward it.
        let weights: Vec<f64> = (0..120).map(|i| 90.0 - i as f64 * 0.5 / 7.0).collect();
        let (series, smoothed) = setup(&daily(date(2024, 1, 1), &weights));
        let intake = IntakeLog::from_entries(
            (0..120)
                .map(|i| IntakeEntry::new(date(2024, 1, 1) + Duration::days(i), 3000, "food"))
                .collect(),
        );
        let today = date(2024, 1, 1) + Duration::days(119);
        let baseline =
            estimate_baseline(&series, &smoothed, &intake, today, &BudgetParams::default())
                .unwrap();

        let final_value = baseline.at(today).unwrap();
        assert!(final_value > 3300.0, "final baseline {}", final_value);
        assert!(final_value < 3700.0, "final baseline {}", final_value);
    }

    #[test]
    fn test_warmup_keeps_seed() {
        let (series, smoothed) = setup(&daily(date(2024, 1, 1), &[90.0, 89.8, 89.6, 89.4]));
        let intake = IntakeLog::from_entries(
            (0..4)
                .map(|i| IntakeEntry::new(date(2024, 1, 1) + Duration::days(i), 2000, "x"))
                .collect(),
        );
        let params = BudgetParams {
            warmup_days: 2,
            ..BudgetParams::default()
        };
        let baseline =
            estimate_baseline(&series, &smoothed, &intake, date(2024, 1, 4), &params).unwrap();

        let seed = seed_baseline(90.0);
        assert_eq!(baseline.at(date(2024, 1, 3)), Some(seed));
        assert_ne!(baseline.at(date(2024, 1, 4)), Some(seed));
        assert_eq!(baseline.adaptations, 1);
    }

    #[test]
    fn test_adaptation_window() {
        let weights: Vec<f64> = (0..15).map(|i| 90.0 - i as f64 * 0.1).collect();
        let (series, smoothed) = setup(&daily(date(2024, 1, 1), &weights));
        let intake = IntakeLog::from_entries(
            (0..15)
                .map(|i| IntakeEntry::new(date(2024, 1, 1) + Duration::days(i), 2200, "x"))
                .collect(),
        );
        let params = BudgetParams {
            adapt_every: 7,
            ..BudgetParams::default()
        };
        let today = date(2024, 1, 15);
        let baseline = estimate_baseline(&series, &smoothed, &intake, today, &params).unwrap();

        // Updates only on day 7 and day 14 after the first observation
        assert_eq!(baseline.adaptations, 2);
        assert_eq!(baseline.at(date(2024, 1, 7)), Some(seed_baseline(90.0)));
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 8);
        let daily_loss = (smoothed.level(start).unwrap() - smoothed.level(end).unwrap()) / 7.0;
        let expected = 0.05 * (2200.0 + daily_loss * 7000.0) + (1.0 - 0.05) * 2700.0;
        assert!(approx_eq(baseline.at(end).unwrap(), expected, 1e-9));
    }

    #[test]
    fn test_invalid_params() {
        let (series, smoothed) = setup(&[(date(2024, 1, 1), 90.0)]);
        let params = BudgetParams {
            adapt_every: 0,
            ..BudgetParams::default()
        };
        let result = estimate_baseline(
            &series,
            &smoothed,
            &IntakeLog::default(),
            date(2024, 1, 1),
            &params,
        );
        assert_eq!(result.unwrap_err(), ModelError::InvalidAdaptation);
    }

    #[test]
    fn test_rate_at_uses_level_then_prediction() {
        use crate::domain::Origin;

        let (mut series, smoothed) = setup(&daily(date(2024, 1, 1), &[90.0, 89.9]));
        series.insert(date(2024, 1, 3), 80.5, Origin::Predicted);

        // Observed range: smoothed level, far from goal → full rate
        assert_eq!(
            rate_at(&series, &smoothed, date(2024, 1, 2), 80.0, 0.5),
            Some(-0.5)
        );
        // Predicted range: raw projected value, 0.5 from goal → dampened
        let r = rate_at(&series, &smoothed, date(2024, 1, 3), 80.0, 0.5).unwrap();
        assert!(approx_eq(r, -0.25, 1e-12));
        // Past the end clamps to the last day
        let r = rate_at(&series, &smoothed, date(2024, 3, 1), 80.0, 0.5).unwrap();
        assert!(approx_eq(r, -0.25, 1e-12));
    }

    #[test]
    fn test_allowed_kcal() {
        let (series, smoothed) = setup(&[(date(2024, 1, 1), 90.0)]);
        let baseline = estimate_baseline(
            &series,
            &smoothed,
            &IntakeLog::default(),
            date(2024, 1, 1),
            &BudgetParams::default(),
        )
        .unwrap();

        let allowed = allowed_kcal(&baseline, date(2024, 1, 1), -0.5).unwrap();
        assert!(approx_eq(allowed, 2200.0, 1e-9));
        let maintenance = allowed_kcal(&baseline, date(2024, 1, 1), 0.0).unwrap();
        assert!(approx_eq(maintenance, 2700.0, 1e-9));
    }
}
