//! Per-day weight series with origin tags.
//!
//! One map keyed by date holds every value together with where it came from,
//! so observed, interpolated and predicted values cannot drift apart.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DateRange, Origin, WeightObservation};
use crate::error::ModelError;

/// Value stored for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub value: f64,
    pub origin: Origin,
}

/// Weight values keyed by date.
#[derive(Debug, Clone, Default)]
pub struct Series {
    entries: BTreeMap<NaiveDate, SeriesEntry>,
}

impl Series {
    /// Builds a series of real observations.
    ///
    /// Input order does not matter. Two observations on the same date are
    /// rejected.
    pub fn from_observations(observations: &[WeightObservation]) -> Result<Self, ModelError> {
        let mut series = Self::default();
        for obs in observations {
            if !series.insert(obs.date, obs.value, Origin::Real) {
                return Err(ModelError::DuplicateDate(obs.date));
            }
        }
        Ok(series)
    }

    /// Inserts a value unless the date already has one.
    ///
    /// Returns false when the date was occupied.
    pub fn insert(&mut self, date: NaiveDate, value: f64, origin: Origin) -> bool {
        match self.entries.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(SeriesEntry { value, origin });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&SeriesEntry> {
        self.entries.get(&date)
    }

    /// Returns the value for a date, whatever its origin.
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.get(date).map(|e| e.value)
    }

    pub fn origin_at(&self, date: NaiveDate) -> Option<Origin> {
        self.get(date).map(|e| e.origin)
    }

    /// True if the user entered a weight on this date.
    pub fn is_real(&self, date: NaiveDate) -> bool {
        self.origin_at(date) == Some(Origin::Real)
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    /// Most recent date with a real observation.
    pub fn last_real(&self) -> Option<NaiveDate> {
        self.entries
            .iter()
            .rev()
            .find(|(_, e)| e.origin == Origin::Real)
            .map(|(d, _)| *d)
    }

    /// The full domain `[first, last]`.
    pub fn range(&self) -> Option<DateRange> {
        DateRange::new(self.first()?, self.last()?)
    }

    /// Removes every entry dated before `cutoff`.
    pub fn truncate(&mut self, cutoff: NaiveDate) {
        self.entries = self.entries.split_off(&cutoff);
    }

    /// Removes all predicted entries.
    pub fn clear_predicted(&mut self) {
        self.entries.retain(|_, e| e.origin != Origin::Predicted);
    }

    /// Finds the most recent pair of consecutive entries more than `days`
    /// apart, returned as `(earlier, later)`.
    pub fn find_gap(&self, days: i64) -> Option<(NaiveDate, NaiveDate)> {
        let dates: Vec<NaiveDate> = self.entries.keys().copied().collect();
        dates
            .windows(2)
            .rev()
            .find(|pair| (pair[1] - pair[0]).num_days() > days)
            .map(|pair| (pair[0], pair[1]))
    }

    /// Iterates entries in date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &SeriesEntry)> {
        self.entries.iter().map(|(d, e)| (*d, e))
    }

    /// Number of entries with the given origin.
    pub fn count(&self, origin: Origin) -> usize {
        self.entries.values().filter(|e| e.origin == origin).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
