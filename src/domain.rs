//! Domain types for weight and intake data representation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::ParseError;

/// Where a value in the weight series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Entered by the user.
    Real,
    /// Linear estimate between two real observations.
    Interpolated,
    /// Projected past the last observation.
    Predicted,
}

impl Origin {
    /// Returns the display name for the origin.
    pub fn display_name(&self) -> &'static str {
        match self {
            Origin::Real => "observed",
            Origin::Interpolated => "interpolated",
            Origin::Predicted => "predicted",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A weight measurement for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightObservation {
    pub date: NaiveDate,
    pub value: f64,
}

impl WeightObservation {
    /// Creates a new observation.
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

impl fmt::Display for WeightObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.value)
    }
}

/// One logged food item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeEntry {
    pub date: NaiveDate,
    pub kcal: i64,
    pub description: String,
}

impl IntakeEntry {
    /// Creates a new intake entry.
    pub fn new(date: NaiveDate, kcal: i64, description: impl Into<String>) -> Self {
        Self {
            date,
            kcal,
            description: description.into(),
        }
    }
}

impl fmt::Display for IntakeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.kcal, self.description)
    }
}

/// Inclusive, contiguous range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, or `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Number of days covered, both ends included.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Iterates over every day in the range in order.
    pub fn days(&self) -> Days {
        Days {
            next: Some(self.start),
            end: self.end,
        }
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

/// Intake entries grouped by day.
#[derive(Debug, Clone, Default)]
pub struct IntakeLog {
    days: BTreeMap<NaiveDate, Vec<IntakeEntry>>,
}

impl IntakeLog {
    /// Groups entries by date. Order within a day is preserved.
    pub fn from_entries(entries: Vec<IntakeEntry>) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<IntakeEntry>> = BTreeMap::new();
        for entry in entries {
            days.entry(entry.date).or_default().push(entry);
        }
        Self { days }
    }

    /// Returns the entries logged on a date.
    pub fn entries_at(&self, date: NaiveDate) -> &[IntakeEntry] {
        self.days.get(&date).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Sum of energy logged on a date. Zero means nothing was logged.
    pub fn consumed_at(&self, date: NaiveDate) -> i64 {
        self.entries_at(date).iter().map(|e| e.kcal).sum()
    }

    pub fn has_entries(&self, date: NaiveDate) -> bool {
        !self.entries_at(date).is_empty()
    }

    /// Drops every entry dated before `cutoff`.
    pub fn truncate(&mut self, cutoff: NaiveDate) {
        self.days = self.days.split_off(&cutoff);
    }

    /// Case-insensitive search over descriptions, in date order.
    pub fn grep(&self, term: &str) -> Vec<&IntakeEntry> {
        let needle = term.to_lowercase();
        self.iter()
            .filter(|e| e.description.to_lowercase().contains(&needle))
            .collect()
    }

    /// Iterates over all entries in date order.
    pub fn iter(&self) -> impl Iterator<Item = &IntakeEntry> {
        self.days.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Evaluates an energy term such as `2x150+30`.
///
/// The term is a `+`-separated sum of `x`-separated products.
pub fn parse_energy_term(term: &str) -> Result<f64, ParseError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(ParseError::InvalidEnergyTerm(term.to_string()));
    }

    term.split('+')
        .map(|summand| {
            summand
                .split('x')
                .map(|factor| {
                    factor
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| ParseError::InvalidEnergyTerm(term.to_string()))
                })
                .product::<Result<f64, ParseError>>()
        })
        .sum()
}

/// The day an entry logged at `now` is attributed to.
///
/// Anything eaten before 5am counts for the previous day.
pub fn intake_day(now: chrono::NaiveDateTime) -> NaiveDate {
    (now - Duration::hours(5)).date()
}
