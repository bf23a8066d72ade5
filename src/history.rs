//! Shared detection history.
//!
//! The reader thread appends samples and the display prunes them. Both go through
//! one `parking_lot::Mutex`, so a render tick sees either a whole sample or none of it.
//! Samples are only removed by [`HistoryStore::prune`], which the display calls on
//! every tick; nothing expires on its own between ticks.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One parsed reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Angle in degrees, as sent by the sensor.
    pub angle: i64,
    /// Distance in centimeters, as sent by the sensor.
    pub distance: i64,
    /// When the reader parsed the line.
    pub timestamp: Instant,
}

impl Sample {
    /// Age relative to `now`. Samples stamped after `now` count as age zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.timestamp)
    }
}

/// Opacity of a detection: 1.0 when fresh, falling linearly to 0.0 at `fade_time`.
pub fn fade_alpha(age: Duration, fade_time: Duration) -> f64 {
    if fade_time.is_zero() {
        return 0.0;
    }
    (1.0 - age.as_secs_f64() / fade_time.as_secs_f64()).max(0.0)
}

#[derive(Debug, Default)]
struct HistoryState {
    samples: Vec<Sample>,
    latest_angle: i64,
}

/// Samples still inside the fade window plus the last angle seen, taken under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    /// Surviving samples in arrival order.
    pub samples: Vec<Sample>,
    /// Angle of the most recently recorded sample, 0 before any arrive.
    pub latest_angle: i64,
}

/// A thread-safe, cloneable handle to the detection history.
#[derive(Clone, Default)]
pub struct HistoryStore(Arc<Mutex<HistoryState>>);

impl HistoryStore {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample and make its angle the latest angle.
    ///
    /// No ordering is enforced on angles; whatever arrives last wins.
    pub fn record(&self, sample: Sample) {
        let mut state = self.0.lock();
        state.samples.push(sample);
        state.latest_angle = sample.angle;
    }

    /// Drop every sample older than `fade_time` at `now`. Returns how many were removed.
    pub fn prune(&self, now: Instant, fade_time: Duration) -> usize {
        let mut state = self.0.lock();
        prune_locked(&mut state, now, fade_time)
    }

    /// Prune and copy out what is left, atomically with respect to [`record`](Self::record).
    pub fn prune_and_snapshot(&self, now: Instant, fade_time: Duration) -> HistorySnapshot {
        let mut state = self.0.lock();
        prune_locked(&mut state, now, fade_time);
        HistorySnapshot {
            samples: state.samples.clone(),
            latest_angle: state.latest_angle,
        }
    }

    /// Copy of the current samples without pruning.
    pub fn samples(&self) -> Vec<Sample> {
        self.0.lock().samples.clone()
    }

    /// Angle of the most recently recorded sample, even if it was pruned.
    pub fn latest_angle(&self) -> i64 {
        self.0.lock().latest_angle
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.0.lock().samples.len()
    }

    /// Whether no samples are held.
    pub fn is_empty(&self) -> bool {
        self.0.lock().samples.is_empty()
    }
}

fn prune_locked(state: &mut HistoryState, now: Instant, fade_time: Duration) -> usize {
    let before = state.samples.len();
    state.samples.retain(|s| s.age(now) <= fade_time);
    before - state.samples.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: Duration = Duration::from_secs(2);

    fn sample_at(base: Instant, offset_ms: u64, angle: i64) -> Sample {
        Sample {
            angle,
            distance: 10,
            timestamp: base + Duration::from_millis(offset_ms),
        }
    }

    #[test]
    fn record_updates_latest_angle() {
        let store = HistoryStore::new();
        assert_eq!(store.latest_angle(), 0);

        let base = Instant::now();
        store.record(sample_at(base, 0, 30));
        store.record(sample_at(base, 1, 10));
        assert_eq!(store.latest_angle(), 10);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn prune_keeps_boundary_sample() {
        let store = HistoryStore::new();
        let base = Instant::now();
        store.record(sample_at(base, 0, 1));
        store.record(sample_at(base, 500, 2));

        // First sample is exactly FADE old
        let removed = store.prune(base + FADE, FADE);
        assert_eq!(removed, 0);
        assert_eq!(store.len(), 2);

        let removed = store.prune(base + FADE + Duration::from_millis(1), FADE);
        assert_eq!(removed, 1);
        assert_eq!(store.samples()[0].angle, 2);
    }

    #[test]
    fn prune_does_not_touch_latest_angle() {
        let store = HistoryStore::new();
        let base = Instant::now();
        store.record(sample_at(base, 0, 77));

        let snapshot = store.prune_and_snapshot(base + Duration::from_secs(10), FADE);
        assert!(snapshot.samples.is_empty());
        assert_eq!(snapshot.latest_angle, 77);
        assert!(store.is_empty());
    }

    #[test]
    fn future_timestamps_have_zero_age() {
        let base = Instant::now();
        let sample = sample_at(base, 100, 0);
        assert_eq!(sample.age(base), Duration::ZERO);
    }

    #[test]
    fn fade_is_linear() {
        assert_eq!(fade_alpha(Duration::ZERO, FADE), 1.0);
        assert!((fade_alpha(Duration::from_millis(500), FADE) - 0.75).abs() < 1e-12);
        assert!((fade_alpha(Duration::from_secs(1), FADE) - 0.5).abs() < 1e-12);
        assert_eq!(fade_alpha(FADE, FADE), 0.0);
        assert_eq!(fade_alpha(Duration::from_secs(3), FADE), 0.0);
    }

    #[test]
    fn zero_fade_window_is_fully_transparent() {
        assert_eq!(fade_alpha(Duration::ZERO, Duration::ZERO), 0.0);
    }
}
