//! Report engine.
//!
//! Pure aggregations over a built [`Model`]: day ledgers, the status
//! summary, the running energy balance, streaks and range statistics. Every
//! report type is `Serialize` so the CLI can emit it as JSON.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::analysis::Model;
use crate::domain::{DateRange, IntakeEntry, IntakeLog, Origin};

// === Quantisation ===

/// Converts between kcal and the user's display unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    unit: f64,
}

impl Quantizer {
    pub fn new(unit: f64) -> Self {
        Self { unit }
    }

    /// Displayed value for an energy amount.
    pub fn quantize(&self, kcal: f64) -> i64 {
        (kcal / self.unit).round() as i64
    }

    /// Energy amount for an entered number of units.
    pub fn dequantize(&self, number: f64) -> i64 {
        (number * self.unit).round() as i64
    }
}

// === Day Ledger ===

/// Allowance and intake for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLedger {
    pub date: NaiveDate,
    pub allowed: f64,
    pub entries: Vec<IntakeEntry>,
    pub consumed: i64,
    pub remaining: f64,
}

impl DayLedger {
    /// Share of the allowance used, in percent, as seen in display units.
    pub fn percent_used(&self, quantizer: &Quantizer) -> Option<f64> {
        let allowed = quantizer.quantize(self.allowed);
        let remaining = quantizer.quantize(self.remaining);
        (allowed != 0).then(|| 100.0 - 100.0 * remaining as f64 / allowed as f64)
    }
}

/// One ledger per day of `[start, end]`. Days before the analysis window
/// are skipped.
pub fn ledger(model: &Model, start: NaiveDate, end: NaiveDate) -> Vec<DayLedger> {
    let Some(range) = DateRange::new(start.max(model.first()), end) else {
        return Vec::new();
    };

    range
        .days()
        .filter_map(|date| {
            Some(DayLedger {
                date,
                allowed: model.allowed_kcal(date)?,
                entries: model.intake().entries_at(date).to_vec(),
                consumed: model.consumed_at(date),
                remaining: model.remaining_at(date)?,
            })
        })
        .collect()
}

/// Ledgers from `start` through today.
pub fn log_since(model: &Model, start: NaiveDate) -> Vec<DayLedger> {
    ledger(model, start, model.today())
}

// === Status ===

/// Progress toward the goal as of today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub today: NaiveDate,
    pub goal: f64,
    /// Smoothed weight today.
    pub level: f64,
    pub kg_lost: f64,
    pub progress_percent: Option<f64>,
    pub kg_to_go: f64,
    pub days_to_go: f64,
    pub goal_date: Option<NaiveDate>,
    /// Length of the projection past the last entry.
    pub projected_days: usize,
    pub baseline: f64,
    /// Days on which the baseline learned from logged intake.
    pub adaptations: usize,
    pub allowed_today: f64,
    pub weight_entered_today: bool,
}

/// Builds the status summary, or `None` if today precedes the model.
pub fn status_summary(model: &Model) -> Option<StatusSummary> {
    let today = model.today();
    Some(StatusSummary {
        today,
        goal: model.config().goal,
        level: model.level_at(today)?,
        kg_lost: model.kg_lost()?,
        progress_percent: model.progress_percent(),
        kg_to_go: model.kg_to_go()?,
        days_to_go: model.days_to_go()?,
        goal_date: model.goal_date(),
        projected_days: model.predicted_days(),
        baseline: model.baseline().at(today)?,
        adaptations: model.baseline().adaptations,
        allowed_today: model.allowed_kcal(today)?,
        weight_entered_today: model.has_weight_today(),
    })
}

/// Human-readable duration: days up to a week, weeks up to four, then
/// four-week months.
pub fn format_duration(days: f64) -> String {
    let (n, unit) = if days <= 7.0 {
        (days, "day")
    } else if days <= 28.0 {
        (days / 7.0, "week")
    } else {
        (days / 28.0, "month")
    };
    let n = (n * 10.0).round() / 10.0;
    let plural = if n == 1.0 { "" } else { "s" };
    format!("{:.1} {}{}", n, unit, plural)
}

// === Energy Balance ===

/// Accumulated overshoot since a start date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyBalance {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Sum of `consumed - allowed` over logged days (kcal).
    pub balance: f64,
    /// Money owed when the balance is positive.
    pub cost: Option<f64>,
}

/// Sum of `consumed - allowed` over days with intake in `[start, end]`.
pub fn kcal_balance(model: &Model, start: NaiveDate, end: NaiveDate) -> f64 {
    let Some(range) = DateRange::new(start, end) else {
        return 0.0;
    };
    range
        .days()
        .filter(|d| model.consumed_at(*d) != 0)
        .filter_map(|d| Some(model.consumed_at(d) as f64 - model.allowed_kcal(d)?))
        .sum()
}

/// Balance from `start` through yesterday. The cost is `factor` per
/// displayed energy unit of overshoot.
pub fn energy_balance(
    model: &Model,
    start: NaiveDate,
    factor: f64,
    quantizer: &Quantizer,
) -> EnergyBalance {
    let end = model.today() - Duration::days(1);
    let balance = kcal_balance(model, start, end);
    let cost = (balance > 0.0).then(|| {
        let cost = factor * quantizer.quantize(balance) as f64;
        (cost * 100.0).round() / 100.0
    });

    EnergyBalance {
        start,
        end,
        balance,
        cost,
    }
}

// === Streaks ===

/// A run of consecutive days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub days: usize,
}

impl Streak {
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(self.days as i64 - 1)
    }
}

/// Longest and current runs of days satisfying a predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    pub longest: Option<Streak>,
    /// Run ending on the last day of the range.
    pub current: Option<Streak>,
}

/// Finds the longest and the current streak over a range.
///
/// A streak still running on the last day of the range competes for the
/// longest one too. The earliest of equally long streaks wins.
pub fn streaks<F>(range: DateRange, predicate: F) -> StreakStats
where
    F: Fn(NaiveDate) -> bool,
{
    let mut longest: Option<Streak> = None;
    let mut current: Option<Streak> = None;

    for d in range.days() {
        if predicate(d) {
            let streak = current.get_or_insert(Streak { start: d, days: 0 });
            streak.days += 1;
        } else if let Some(ended) = current.take() {
            longest = longer(longest, ended);
        }
    }

    if let Some(ongoing) = current {
        longest = longer(longest, ongoing);
    }

    StreakStats { longest, current }
}

fn longer(best: Option<Streak>, candidate: Streak) -> Option<Streak> {
    match best {
        Some(best) if best.days >= candidate.days => Some(best),
        _ => Some(candidate),
    }
}

// === Range Statistics ===

/// Minimum, maximum and mean of a per-day quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeStats {
    pub min: f64,
    pub min_date: NaiveDate,
    pub max: f64,
    pub max_date: NaiveDate,
    /// Mean per day over the days with a value.
    pub avg: f64,
    pub count: usize,
}

impl RangeStats {
    pub fn avg_per_week(&self) -> f64 {
        self.avg * 7.0
    }
}

/// Statistics over the days where `value` yields something. The earliest
/// date wins ties.
pub fn range_stats<F>(range: DateRange, value: F) -> Option<RangeStats>
where
    F: Fn(NaiveDate) -> Option<f64>,
{
    let values: Vec<(NaiveDate, f64)> = range
        .days()
        .filter_map(|d| value(d).map(|v| (d, v)))
        .collect();

    let (first_date, first_value) = *values.first()?;
    let mut stats = RangeStats {
        min: first_value,
        min_date: first_date,
        max: first_value,
        max_date: first_date,
        avg: 0.0,
        count: values.len(),
    };

    for &(d, v) in &values[1..] {
        if v < stats.min {
            stats.min = v;
            stats.min_date = d;
        }
        if v > stats.max {
            stats.max = v;
            stats.max_date = d;
        }
    }
    stats.avg = values.iter().map(|(_, v)| v).sum::<f64>() / values.len() as f64;

    Some(stats)
}

/// What a statistic measures, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Weight,
    Energy,
}

/// Result of one row of the statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StatValue {
    Streaks(StreakStats),
    Numbers(Option<RangeStats>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistic {
    pub name: &'static str,
    pub quantity: Quantity,
    pub value: StatValue,
}

/// The statistics table over `[first, last_real - 1]`.
///
/// The last observed day is excluded because its intake is usually still
/// incomplete. Empty when only one day has been observed.
pub fn statistics(model: &Model) -> Vec<Statistic> {
    let end = model.last_real() - Duration::days(1);
    let Some(range) = DateRange::new(model.first(), end) else {
        return Vec::new();
    };

    let intake = model.intake();
    let consumed = |d: NaiveDate| {
        let kcal = intake.consumed_at(d);
        (kcal != 0).then_some(kcal as f64)
    };

    vec![
        Statistic {
            name: "weight loss",
            quantity: Quantity::Weight,
            value: StatValue::Numbers(range_stats(range, |d| {
                Some(model.level_at(d)? - model.level_at(d + Duration::days(1))?)
            })),
        },
        Statistic {
            name: "days with input entries",
            quantity: Quantity::Energy,
            value: StatValue::Streaks(streaks(range, |d| intake.has_entries(d))),
        },
        Statistic {
            name: "days with weight entry",
            quantity: Quantity::Weight,
            value: StatValue::Streaks(streaks(range, |d| {
                model.series().origin_at(d) == Some(Origin::Real)
            })),
        },
        Statistic {
            name: "days under goal",
            quantity: Quantity::Energy,
            value: StatValue::Streaks(streaks(range, |d| {
                model
                    .allowed_kcal(d)
                    .is_some_and(|allowed| model.consumed_at(d) as f64 <= allowed)
            })),
        },
        Statistic {
            name: "energy consumed",
            quantity: Quantity::Energy,
            value: StatValue::Numbers(range_stats(range, consumed)),
        },
        Statistic {
            name: "energy under goal",
            quantity: Quantity::Energy,
            value: StatValue::Numbers(range_stats(range, |d| {
                Some(model.allowed_kcal(d)? - consumed(d)?)
            })),
        },
    ]
}

// === Search ===

/// Matching intake entries and their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrepResult {
    pub entries: Vec<IntakeEntry>,
    pub total: i64,
}

/// Case-insensitive search over intake descriptions.
pub fn grep(intake: &IntakeLog, term: &str) -> GrepResult {
    let entries: Vec<IntakeEntry> = intake.grep(term).into_iter().cloned().collect();
    let total = entries.iter().map(|e| e.kcal).sum();
    GrepResult { entries, total }
}

// === Timeline ===

/// Everything known about one day, for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub date: NaiveDate,
    pub weight: f64,
    pub origin: Origin,
    pub level: Option<f64>,
    /// Smoothed daily change.
    pub trend: Option<f64>,
    pub baseline: Option<f64>,
    /// Allowance at a weekly rate of zero.
    pub maintenance: Option<f64>,
    pub allowed: Option<f64>,
    pub consumed: i64,
}

/// One row per day of the series domain, projection included.
pub fn timeline(model: &Model) -> Vec<TimelineRow> {
    model
        .series()
        .iter()
        .map(|(date, entry)| TimelineRow {
            date,
            weight: entry.value,
            origin: entry.origin,
            level: model.smoothed().level(date),
            trend: model.smoothed().trend(date),
            baseline: model.baseline().at(date),
            maintenance: model.allowed_kcal_at_rate(date, 0.0),
            allowed: model.allowed_kcal(date),
            consumed: model.consumed_at(date),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ModelConfig;
    use crate::domain::WeightObservation;

    /// Helper to create a date.
    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    /// Helper to build a model with daily weights and the given intake.
    fn model_with(days: i64, intake: Vec<IntakeEntry>, today: NaiveDate) -> Model {
        let start = date(2024, 1, 1);
        let weights: Vec<WeightObservation> = (0..days)
            .map(|i| WeightObservation::new(start + Duration::days(i), 90.0 - 0.1 * i as f64))
            .collect();
        Model::build(&weights, intake, &ModelConfig::new(80.0, 0.5), today).unwrap()
    }

    #[test]
    fn test_quantizer() {
        let q = Quantizer::new(100.0);
        assert_eq!(q.quantize(250.0), 3);
        assert_eq!(q.quantize(-249.0), -2);
        assert_eq!(q.dequantize(2.5), 250);

        let identity = Quantizer::new(1.0);
        assert_eq!(identity.quantize(1999.6), 2000);
        assert_eq!(identity.dequantize(330.0), 330);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(1.0), "1.0 day");
        assert_eq!(format_duration(5.0), "5.0 days");
        assert_eq!(format_duration(7.0), "7.0 days");
        assert_eq!(format_duration(14.0), "2.0 weeks");
        assert_eq!(format_duration(28.0), "4.0 weeks");
        assert_eq!(format_duration(56.0), "2.0 months");
        assert_eq!(format_duration(29.4), "1.1 months");
    }

    #[test]
    fn test_streaks() {
        let r = range(date(2024, 1, 1), date(2024, 1, 10));
        // Days 2-4 and 7-10 qualify
        let hits = [2, 3, 4, 7, 8, 9, 10];
        let stats = streaks(r, |d| hits.contains(&chrono::Datelike::day(&d)));

        assert_eq!(
            stats.longest,
            Some(Streak {
                start: date(2024, 1, 7),
                days: 4
            })
        );
        assert_eq!(stats.current, stats.longest);
        assert_eq!(stats.current.unwrap().end(), date(2024, 1, 10));
    }

    #[test]
    fn test_ongoing_streak_counts_as_longest() {
        let r = range(date(2024, 1, 1), date(2024, 1, 8));
        // 2 days, a break, then 5 days still running
        let stats = streaks(r, |d| d != date(2024, 1, 3));

        let longest = stats.longest.unwrap();
        assert_eq!(longest.start, date(2024, 1, 4));
        assert_eq!(longest.days, 5);
        assert_eq!(stats.current, Some(longest));
    }

    #[test]
    fn test_streaks_broken_at_end() {
        let r = range(date(2024, 1, 1), date(2024, 1, 5));
        let stats = streaks(r, |d| d < date(2024, 1, 4));

        assert_eq!(
            stats.longest,
            Some(Streak {
                start: date(2024, 1, 1),
                days: 3
            })
        );
        assert!(stats.current.is_none());

        let none = streaks(r, |_| false);
        assert_eq!(none, StreakStats::default());
    }

    #[test]
    fn test_streaks_tie_keeps_earliest() {
        let r = range(date(2024, 1, 1), date(2024, 1, 5));
        let stats = streaks(r, |d| d != date(2024, 1, 3));
        assert_eq!(stats.longest.unwrap().start, date(2024, 1, 1));
        assert_eq!(stats.current.unwrap().start, date(2024, 1, 4));
    }

    #[test]
    fn test_range_stats() {
        let r = range(date(2024, 1, 1), date(2024, 1, 5));
        let values = [Some(3.0), None, Some(1.0), Some(5.0), Some(1.0)];
        let stats = range_stats(r, |d| values[(d - date(2024, 1, 1)).num_days() as usize]).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.min_date, date(2024, 1, 3));
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.max_date, date(2024, 1, 4));
        assert!(approx_eq(stats.avg, 2.5, 1e-12));
        assert!(approx_eq(stats.avg_per_week(), 17.5, 1e-12));

        assert!(range_stats(r, |_| None).is_none());
    }

    #[test]
    fn test_ledger() {
        let today = date(2024, 1, 5);
        let intake = vec![
            IntakeEntry::new(date(2024, 1, 4), 600, "breakfast"),
            IntakeEntry::new(date(2024, 1, 4), 900, "dinner"),
            IntakeEntry::new(today, 400, "lunch"),
        ];
        let model = model_with(5, intake, today);

        let days = log_since(&model, model.status_start());
        assert_eq!(days.len(), 2);

        let yesterday = &days[0];
        assert_eq!(yesterday.date, date(2024, 1, 4));
        assert_eq!(yesterday.entries.len(), 2);
        assert_eq!(yesterday.consumed, 1500);
        assert!(approx_eq(
            yesterday.remaining,
            yesterday.allowed - 1500.0,
            1e-9
        ));
        let used = yesterday.percent_used(&Quantizer::new(1.0)).unwrap();
        let allowed = yesterday.allowed.round();
        let remaining = yesterday.remaining.round();
        assert!(approx_eq(used, 100.0 - 100.0 * remaining / allowed, 1e-9));

        // Clamped to the analysis window
        let all = log_since(&model, date(2023, 12, 1));
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].date, date(2024, 1, 1));
    }

    #[test]
    fn test_percent_used_in_display_units() {
        let day = DayLedger {
            date: date(2024, 1, 1),
            allowed: 2249.0,
            entries: Vec::new(),
            consumed: 1100,
            remaining: 1149.0,
        };

        // 22 units allowed, 11 left
        assert_eq!(day.percent_used(&Quantizer::new(100.0)), Some(50.0));
        let raw = day.percent_used(&Quantizer::new(1.0)).unwrap();
        assert!(approx_eq(raw, 100.0 - 100.0 * 1149.0 / 2249.0, 1e-9));

        let empty = DayLedger {
            allowed: 40.0,
            remaining: 40.0,
            ..day
        };
        assert_eq!(empty.percent_used(&Quantizer::new(100.0)), None);
    }

    #[test]
    fn test_status_summary() {
        let today = date(2024, 1, 10);
        let model = model_with(10, Vec::new(), today);
        let status = status_summary(&model).unwrap();

        assert_eq!(status.today, today);
        assert_eq!(status.goal, 80.0);
        assert!(status.kg_lost > 0.0);
        assert!(approx_eq(status.kg_to_go, status.level - 80.0, 1e-12));
        assert!(approx_eq(
            status.days_to_go,
            status.kg_to_go * 7000.0 / 500.0,
            1e-9
        ));
        assert!(approx_eq(status.allowed_today, status.baseline - 500.0, 1e-9));
        assert!(status.goal_date.is_some());
        assert!(status.weight_entered_today);
        assert_eq!(status.adaptations, 0);
    }

    #[test]
    fn test_energy_balance() {
        let today = date(2024, 1, 5);
        let model = model_with(5, Vec::new(), today);
        let allowed_2 = model.allowed_kcal(date(2024, 1, 2)).unwrap();
        let allowed_3 = model.allowed_kcal(date(2024, 1, 3)).unwrap();

        let intake = vec![
            IntakeEntry::new(date(2024, 1, 2), (allowed_2 + 300.0).round() as i64, "feast"),
            IntakeEntry::new(date(2024, 1, 3), (allowed_3 - 100.0).round() as i64, "salad"),
            // Today is not part of the balance
            IntakeEntry::new(today, 5000, "cake"),
        ];
        let model = model_with(5, intake, today);
        let expected: f64 = [date(2024, 1, 2), date(2024, 1, 3)]
            .iter()
            .map(|d| model.consumed_at(*d) as f64 - model.allowed_kcal(*d).unwrap())
            .sum();

        let balance = energy_balance(&model, date(2024, 1, 1), 0.01, &Quantizer::new(1.0));
        assert_eq!(balance.end, date(2024, 1, 4));
        assert!(approx_eq(balance.balance, expected, 1e-9));

        assert!(balance.balance > 0.0);
        let cost = balance.cost.unwrap();
        assert!(approx_eq(
            cost,
            (balance.balance.round() * 0.01 * 100.0).round() / 100.0,
            1e-9
        ));
    }

    #[test]
    fn test_kcal_balance_skips_unlogged_days() {
        let today = date(2024, 1, 5);
        let model = model_with(5, Vec::new(), today);
        assert_eq!(kcal_balance(&model, date(2024, 1, 1), date(2024, 1, 4)), 0.0);
        assert_eq!(kcal_balance(&model, date(2024, 1, 4), date(2024, 1, 1)), 0.0);
    }

    #[test]
    fn test_statistics() {
        let today = date(2024, 1, 8);
        let intake = vec![
            IntakeEntry::new(date(2024, 1, 1), 1500, "a"),
            IntakeEntry::new(date(2024, 1, 2), 1700, "b"),
            IntakeEntry::new(date(2024, 1, 4), 1600, "c"),
        ];
        let model = model_with(8, intake, today);
        let stats = statistics(&model);
        assert_eq!(stats.len(), 6);

        let find = |name: &str| stats.iter().find(|s| s.name == name).unwrap().value.clone();

        match find("days with input entries") {
            StatValue::Streaks(s) => {
                assert_eq!(s.longest.unwrap().days, 2);
                assert!(s.current.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }

        match find("days with weight entry") {
            StatValue::Streaks(s) => assert_eq!(s.longest.unwrap().days, 7),
            other => panic!("unexpected {:?}", other),
        }

        match find("energy consumed") {
            StatValue::Numbers(Some(n)) => {
                assert_eq!(n.count, 3);
                assert_eq!(n.min, 1500.0);
                assert_eq!(n.max, 1700.0);
                assert_eq!(n.max_date, date(2024, 1, 2));
                assert!(approx_eq(n.avg, 1600.0, 1e-9));
            }
            other => panic!("unexpected {:?}", other),
        }

        match find("weight loss") {
            StatValue::Numbers(Some(n)) => {
                assert_eq!(n.count, 7);
                assert!(n.avg > 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_statistics_single_day() {
        let model = model_with(1, Vec::new(), date(2024, 1, 1));
        assert!(statistics(&model).is_empty());
    }

    #[test]
    fn test_grep() {
        let log = IntakeLog::from_entries(vec![
            IntakeEntry::new(date(2024, 1, 1), 300, "Apple pie"),
            IntakeEntry::new(date(2024, 1, 2), 80, "apple"),
            IntakeEntry::new(date(2024, 1, 2), 500, "pizza"),
        ]);

        let result = grep(&log, "APPLE");
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.total, 380);

        let empty = grep(&log, "salad");
        assert!(empty.entries.is_empty());
        assert_eq!(empty.total, 0);
    }

    #[test]
    fn test_timeline() {
        let model = model_with(3, Vec::new(), date(2024, 1, 3));
        let rows = timeline(&model);

        assert_eq!(rows.len(), model.series().len());
        assert_eq!(rows[0].origin, Origin::Real);
        assert_eq!(rows.last().unwrap().origin, Origin::Predicted);
        assert!(rows.iter().all(|r| r.level.is_some() && r.allowed.is_some()));
        assert_eq!(rows[0].maintenance, rows[0].baseline);

        let json = serde_json::to_string(&rows[0]).unwrap();
        assert!(json.contains("\"origin\":\"real\""));
    }

    #[test]
    fn test_statistics_serialize() {
        let model = model_with(4, Vec::new(), date(2024, 1, 4));
        let json = serde_json::to_value(statistics(&model)).unwrap();
        assert_eq!(json[0]["name"], "weight loss");
        assert_eq!(json[0]["value"]["kind"], "numbers");
        assert_eq!(json[1]["value"]["kind"], "streaks");
    }
}
