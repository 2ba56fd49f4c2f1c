const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 60.0 * 60.0;
const MAX_DPS: usize = 15;

/// Format a time in seconds as `HH:MM:SS`, with `seconds_dps` decimal places on the
/// seconds field. Hours are not wrapped at 24.
#[must_use]
pub fn convert_time_to_readable(time: f64, seconds_dps: usize) -> String {
    let time = time.max(0.0);
    let hours = (time / SECONDS_PER_HOUR).floor();
    let remainder = time % SECONDS_PER_HOUR;
    let minutes = (remainder / SECONDS_PER_MINUTE).floor();
    // Ties round up rather than to even.
    let factor = 10f64.powi(seconds_dps.min(MAX_DPS) as i32);
    let seconds = ((remainder % SECONDS_PER_MINUTE) * factor).round() / factor;

    let width = if seconds_dps == 0 { 2 } else { 3 + seconds_dps };
    format!("{hours:02}:{minutes:02}:{seconds:0width$.seconds_dps$}")
}
