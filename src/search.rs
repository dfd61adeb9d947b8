//! Search for the instants at which a discrete function of time changes value.
//!
//! The function is sampled on a regular grid; every pair of neighbouring samples with different
//! values brackets a transition, and each bracket is subdivided until it is narrower than the
//! requested precision. Transitions closer together than the sampling step can be missed, so the
//! step must be shorter than the shortest state the caller cares about.

use crate::Result;
use chrono::{DateTime, Duration, Utc};

/// Default precision of a located transition (one millisecond).
pub const DEFAULT_EPSILON: Duration = Duration::milliseconds(1);

/// Number of points each bracket is subdivided into per refinement round.
pub const SUBDIVISIONS: usize = 12;

/// Finds every instant in `[start, end]` at which `f` changes value.
///
/// Returns `(instant, new_value)` pairs in chronological order. Each instant is the first
/// sampled point carrying the new value, at most `epsilon` after the true transition.
///
/// # Errors
/// Propagates the first error returned by `f`.
///
/// # Example
/// ```
/// # use sun_times::search::{find_discrete, DEFAULT_EPSILON};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let switch = Utc.with_ymd_and_hms(2024, 1, 1, 7, 31, 12).unwrap();
/// let events = find_discrete(
///     start,
///     start + Duration::days(1),
///     Duration::minutes(10),
///     DEFAULT_EPSILON,
///     |t| Ok(t >= switch),
/// )
/// .unwrap();
///
/// assert_eq!(events.len(), 1);
/// assert!((events[0].0 - switch).num_milliseconds().abs() <= 1);
/// assert!(events[0].1);
/// ```
pub fn find_discrete<V, F>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    epsilon: Duration,
    mut f: F,
) -> Result<Vec<(DateTime<Utc>, V)>>
where
    V: Copy + PartialEq,
    F: FnMut(DateTime<Utc>) -> Result<V>,
{
    let span = seconds(end - start);
    let step = seconds(step);
    let epsilon = seconds(epsilon);
    if span <= 0.0 || step <= 0.0 || epsilon <= 0.0 {
        return Ok(Vec::new());
    }

    let at = |offset: f64| start + Duration::microseconds((offset * 1e6).round() as i64);

    let samples = (span / step).ceil() as usize + 1;
    let mut offsets = linspace(0.0, span, samples.max(2));

    loop {
        let values = offsets
            .iter()
            .map(|&offset| f(at(offset)))
            .collect::<Result<Vec<V>>>()?;

        let brackets: Vec<usize> = (0..values.len() - 1)
            .filter(|&i| values[i] != values[i + 1])
            .collect();
        if brackets.is_empty() {
            return Ok(Vec::new());
        }

        let widest = brackets
            .iter()
            .map(|&i| offsets[i + 1] - offsets[i])
            .fold(0.0_f64, f64::max);

        if widest <= epsilon {
            return Ok(brackets
                .into_iter()
                .map(|i| (at(offsets[i + 1]), values[i + 1]))
                .collect());
        }

        offsets = brackets
            .iter()
            .flat_map(|&i| linspace(offsets[i], offsets[i + 1], SUBDIVISIONS))
            .collect();
    }
}

fn seconds(duration: Duration) -> f64 {
    duration.num_microseconds().map_or_else(
        || duration.num_seconds() as f64,
        |micros| micros as f64 / 1e6,
    )
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
}
