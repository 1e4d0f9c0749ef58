//! Linear gap filling between real observations.

use chrono::NaiveDate;

use crate::domain::{DateRange, Origin};
use crate::series::Series;

/// Fills every missing day between consecutive real observations.
///
/// For `a < d < b` with real values at `a` and `b`:
///
/// ```text
/// value(d) = value(a) + (value(a) - value(b)) / (a - b) × (d - a)
/// ```
///
/// Returns the number of days filled. With fewer than two real
/// observations there is nothing to fill.
pub fn interpolate_gaps(series: &mut Series) -> usize {
    let anchors: Vec<(NaiveDate, f64)> = series
        .iter()
        .filter(|(_, e)| e.origin == Origin::Real)
        .map(|(d, e)| (d, e.value))
        .collect();

    let mut filled = 0;
    for pair in anchors.windows(2) {
        let (a, value_a) = pair[0];
        let (b, value_b) = pair[1];

        let (Some(start), Some(end)) = (a.succ_opt(), b.pred_opt()) else {
            continue;
        };
        let Some(gap) = DateRange::new(start, end) else {
            // Consecutive days
            continue;
        };

        let slope = (value_a - value_b) / (a - b).num_days() as f64;
        for d in gap.days() {
            let value = value_a + slope * (d - a).num_days() as f64;
            if series.insert(d, value, Origin::Interpolated) {
                filled += 1;
            }
        }
    }

    if filled > 0 {
        log::debug!("Interpolated {} missing days", filled);
    }
    filled
}
