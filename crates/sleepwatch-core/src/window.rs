//! Clock-time window arithmetic.
//!
//! Every value here is minutes since midnight in `0..1440`. Callers are
//! responsible for normalizing into that range; out-of-range input is not
//! checked.

use chrono::Timelike;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Minutes since midnight for anything carrying an hour and minute.
pub fn minutes_of_day<T: Timelike>(t: &T) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Whether `current` lies in the sleep period `[sleep, wake)`.
///
/// When `sleep >= wake` the period wraps past midnight, so `sleep == wake`
/// covers the whole day.
pub fn is_time_between(current: u32, sleep: u32, wake: u32) -> bool {
    if sleep < wake {
        current >= sleep && current < wake
    } else {
        current >= sleep || current < wake
    }
}

/// Whether the circular distance between `current` and `target` is at most
/// `window` minutes.
pub fn is_time_close(current: u32, target: u32, window: u32) -> bool {
    circular_distance(current, target) <= window
}

/// Minutes from `current` forward to the next occurrence of `target`.
pub fn minutes_until(current: u32, target: u32) -> u32 {
    if target >= current {
        target - current
    } else {
        MINUTES_PER_DAY - current + target
    }
}

/// Length of the sleep period in hours, `(wake - sleep) mod 24h`.
pub fn sleep_hours(sleep: u32, wake: u32) -> f64 {
    f64::from(minutes_until(sleep, wake)) / 60.0
}

fn circular_distance(a: u32, b: u32) -> u32 {
    let diff = a.abs_diff(b);
    diff.min(MINUTES_PER_DAY - diff)
}
