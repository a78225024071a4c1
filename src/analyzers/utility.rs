use crate::time_of_day::{TimeOfDay, from_nanos_since_midnight, nanos_since_midnight};

/// Share of `part` in `total` as a percentage. Returns 0.0 for an empty total.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Arithmetic mean of times of day, taken over nanoseconds since midnight.
/// Returns `None` for empty input.
pub fn mean_time(values: impl IntoIterator<Item = TimeOfDay>) -> Option<TimeOfDay> {
    let (sum, count) = values
        .into_iter()
        .fold((0u128, 0u128), |(sum, count), t| {
            (sum + u128::from(nanos_since_midnight(t)), count + 1)
        });
    if count == 0 {
        return None;
    }
    from_nanos_since_midnight(u64::try_from(sum / count).ok()?)
}
