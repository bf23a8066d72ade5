//! Pruning and fading of the shared history.

use radar_sweep::gui::RadarFrame;
use radar_sweep::history::{fade_alpha, HistoryStore, Sample};
use std::time::{Duration, Instant};

const FADE: Duration = Duration::from_secs(2);

fn populate(store: &HistoryStore, base: Instant, offsets_ms: &[u64]) -> Vec<Sample> {
    offsets_ms
        .iter()
        .enumerate()
        .map(|(i, &ms)| {
            let sample = Sample {
                angle: i as i64,
                distance: 10 * i as i64,
                timestamp: base + Duration::from_millis(ms),
            };
            store.record(sample);
            sample
        })
        .collect()
}

#[test]
fn prune_keeps_exactly_samples_within_window() {
    let base = Instant::now();
    let offsets = [0, 250, 999, 1000, 1001, 1500, 2999, 3000];

    for now_ms in [0u64, 1000, 2999, 3000, 3001, 4000, 5001] {
        let store = HistoryStore::new();
        let inserted = populate(&store, base, &offsets);
        let now = base + Duration::from_millis(now_ms);

        store.prune(now, FADE);

        let expected: Vec<Sample> = inserted
            .iter()
            .copied()
            .filter(|s| s.age(now) <= FADE)
            .collect();
        assert_eq!(store.samples(), expected, "now = {now_ms} ms");
    }
}

#[test]
fn prune_preserves_insertion_order() {
    let store = HistoryStore::new();
    let base = Instant::now();
    // Out-of-order timestamps stay in arrival order
    populate(&store, base, &[500, 100, 900]);

    store.prune(base + Duration::from_millis(2200), FADE);
    let angles: Vec<i64> = store.samples().iter().map(|s| s.angle).collect();
    assert_eq!(angles, vec![0, 2]);
}

#[test]
fn frame_alpha_matches_linear_fade() {
    let store = HistoryStore::new();
    let base = Instant::now();
    let inserted = populate(&store, base, &[0, 400, 1000, 1600, 2000]);
    let now = base + FADE;

    let frame = RadarFrame::capture(&store, now, FADE);
    assert_eq!(frame.detections.len(), inserted.len());

    for (detection, sample) in frame.detections.iter().zip(&inserted) {
        let age = sample.age(now).as_secs_f64();
        let expected = (1.0 - age / FADE.as_secs_f64()).max(0.0);
        assert!((detection.alpha - expected).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&detection.alpha));
    }
    assert_eq!(frame.detections[0].alpha, 0.0);
    assert_eq!(frame.detections[4].alpha, 1.0);
}

#[test]
fn just_past_the_window_is_pruned_not_negative() {
    let store = HistoryStore::new();
    let base = Instant::now();
    populate(&store, base, &[0]);

    let frame = RadarFrame::capture(&store, base + FADE + Duration::from_micros(1), FADE);
    assert!(frame.detections.is_empty());
    assert_eq!(fade_alpha(FADE + Duration::from_micros(1), FADE), 0.0);
}
