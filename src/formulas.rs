//! Energy-balance constants and the rate-dampening rule.

/// Energy stored per kilogram of body weight (kcal).
pub const KCAL_PER_KG: f64 = 7000.0;

/// Generic maintenance estimate per kilogram of body weight (kcal/kg/day).
pub const SEED_KCAL_PER_KG: f64 = 25.0;

/// Activity multiplier applied to the generic maintenance estimate.
pub const ACTIVITY_FACTOR: f64 = 1.2;

/// Distance from the goal below which a predicted value counts as converged.
pub const GOAL_EPSILON: f64 = 0.1;

/// Days per week, for converting weekly rates to daily ones.
pub const DAYS_PER_WEEK: f64 = 7.0;

/// Signed rate of change toward `goal`.
///
/// Full magnitude `rate` while more than one unit away from the goal, then
/// shrinking linearly to zero:
///
/// ```text
/// dampened(w, goal, rate) = sign(goal - w) × rate   if |goal - w| > 1
///                         = (goal - w) × rate       otherwise
/// ```
pub fn dampened_rate(value: f64, goal: f64, rate: f64) -> f64 {
    let distance = goal - value;
    if distance.abs() > 1.0 {
        distance.signum() * rate
    } else {
        distance * rate
    }
}

/// Generic first-day maintenance estimate for a body weight.
pub fn seed_baseline(weight: f64) -> f64 {
    weight * SEED_KCAL_PER_KG * ACTIVITY_FACTOR
}

/// Daily energy difference (kcal) that yields `weekly_rate` kg per week.
pub fn weekly_rate_to_kcal(weekly_rate: f64) -> f64 {
    weekly_rate * KCAL_PER_KG / DAYS_PER_WEEK
}
