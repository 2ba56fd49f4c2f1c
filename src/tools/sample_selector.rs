//! Sample position selection
//!
//! Picks whole-second timestamps spread evenly across a media file.
//!
//! - The first sample is taken `SAFE_OFFSET` seconds from the start.
//! - The last sample is at the whole second nearest the end, unless the duration is itself
//!   a whole number of seconds, in which case it is pulled in by `SAFE_OFFSET`.
//! - Samples are never closer together than `SAFE_OFFSET`; when they would be, fewer
//!   samples are produced, so a requested count is a maximum.
//! - Media shorter than `SAFE_OFFSET` produces no samples.

/// Minimum spacing, in seconds, from either end of the media and between samples.
const SAFE_OFFSET: f64 = 1.0;

/// Select up to `sample_count` evenly spaced sample positions.
#[must_use]
pub fn calculate_by_count(duration: Option<f64>, sample_count: u32) -> Vec<u32> {
    let Some(last_sample) = last_sample(duration) else {
        return Vec::new();
    };

    if sample_count <= 1 {
        return vec![SAFE_OFFSET as u32];
    }

    let mut interval_count = f64::from(sample_count - 1);
    let mut interval_size = (last_sample - SAFE_OFFSET) / interval_count;

    if interval_size < SAFE_OFFSET {
        interval_size = SAFE_OFFSET;
        interval_count = ((last_sample - SAFE_OFFSET) / interval_size).floor();
    }

    accumulate(interval_count, interval_size)
}

/// Select sample positions `interval` seconds apart (never closer than one second).
#[must_use]
pub fn calculate_by_interval(duration: Option<f64>, interval: f64) -> Vec<u32> {
    let Some(last_sample) = last_sample(duration) else {
        return Vec::new();
    };

    let interval_size = if interval.is_nan() || interval < SAFE_OFFSET {
        SAFE_OFFSET
    } else {
        interval
    };
    let interval_count = ((last_sample - SAFE_OFFSET) / interval_size).floor();

    accumulate(interval_count, interval_size)
}

fn last_sample(duration: Option<f64>) -> Option<f64> {
    let duration = duration.filter(|d| d.is_finite() && *d >= SAFE_OFFSET)?;

    let mut last_sample = duration.floor();
    if last_sample == duration {
        last_sample -= SAFE_OFFSET;
    }
    Some(last_sample)
}

/// Emits `interval_count + 1` samples, flooring a running total that is never rounded
/// itself so fractional intervals do not drift.
fn accumulate(interval_count: f64, interval_size: f64) -> Vec<u32> {
    let interval_count = if interval_count > 0.0 {
        interval_count as usize
    } else {
        0
    };

    let mut previous = SAFE_OFFSET;
    let mut samples = Vec::with_capacity(interval_count + 1);
    samples.push(previous as u32);
    for _ in 0..interval_count {
        let next = previous + interval_size;
        samples.push(next.floor() as u32);
        previous = next;
    }
    samples
}
