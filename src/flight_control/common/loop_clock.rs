use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Wall-clock timestamps derived from the tokio monotonic clock.
///
/// Pinned once at startup; every later reading is the pinned UTC time plus
/// the monotonic time elapsed since. This keeps tick stamps and goal receipt
/// stamps on one monotone time line, and lets tests drive both with
/// `tokio::time::pause`/`advance`.
#[derive(Debug, Clone, Copy)]
pub struct LoopClock {
    start_time: DateTime<Utc>,
    start_instant: Instant,
}

impl LoopClock {
    pub fn new() -> Self { Self::pinned_at(Utc::now()) }

    pub fn pinned_at(start_time: DateTime<Utc>) -> Self {
        Self { start_time, start_instant: Instant::now() }
    }

    pub fn start(&self) -> DateTime<Utc> { self.start_time }

    pub fn at(&self, instant: Instant) -> DateTime<Utc> {
        let elapsed = instant.saturating_duration_since(self.start_instant);
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|dt| self.start_time.checked_add_signed(dt))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn now(&self) -> DateTime<Utc> { self.at(Instant::now()) }
}

impl Default for LoopClock {
    fn default() -> Self { Self::new() }
}

/// Fractional seconds of a [`TimeDelta`].
#[allow(clippy::cast_precision_loss)]
pub fn secs(dt: TimeDelta) -> f64 {
    match dt.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => dt.num_milliseconds() as f64 / 1e3,
    }
}

/// [`TimeDelta`] from fractional seconds, rounded to microseconds.
#[allow(clippy::cast_possible_truncation)]
pub fn delta_from_secs(s: f64) -> TimeDelta { TimeDelta::microseconds((s * 1e6).round() as i64) }
