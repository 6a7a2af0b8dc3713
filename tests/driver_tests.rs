//! Driver Tests
//!
//! Tests for:
//! - Ping-pong export schedule shape
//! - Export timing defaults
//! - Pointer and orientation input mapping

use timepiece::driver::{InputState, Orientation, PingPong, ping_pong_schedule};
use timepiece::ExportSettings;

const EPSILON: f32 = 1e-6;

// ============================================================================
// Schedule
// ============================================================================

#[test]
fn thirty_frame_schedule_peaks_in_the_middle() {
    let schedule = ping_pong_schedule(30);

    assert_eq!(schedule.len(), 59);
    assert_eq!(schedule[0], 0.0);
    assert_eq!(schedule[58], 0.0);
    assert!((schedule[29] - 1.0).abs() < EPSILON);

    let peak = schedule
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);
    assert_eq!(peak, Some(29));
}

#[test]
fn schedule_is_symmetric_and_bounded() {
    let schedule = ping_pong_schedule(12);
    let n = schedule.len();
    for i in 0..n {
        assert!((0.0..=1.0).contains(&schedule[i]));
        assert!((schedule[i] - schedule[n - 1 - i]).abs() < EPSILON, "index {i}");
    }
}

#[test]
fn schedule_rises_then_falls() {
    let schedule = ping_pong_schedule(8);
    let (up, down) = schedule.split_at(8);
    assert!(up.windows(2).all(|w| w[1] > w[0]));
    assert!(down.windows(2).all(|w| w[1] < w[0]));
    assert!(down[0] < up[7]);
}

#[test]
fn iterator_reports_exact_length() {
    let mut schedule = PingPong::new(5);
    assert_eq!(schedule.len(), 9);
    schedule.next();
    assert_eq!(schedule.len(), 8);
    assert_eq!(PingPong::total(0), 0);
}

#[test]
fn default_export_renders_149_frames() {
    let settings = ExportSettings::default();
    assert_eq!(settings.frames(), 75);
    assert_eq!(PingPong::total(settings.frames()), 149);
    assert_eq!(settings.frame_delay_ms(), 33);
    assert_eq!(settings.pause_ms, 500);
}

// ============================================================================
// Pointer Input
// ============================================================================

#[test]
fn pointer_maps_to_unit_square() {
    let mut input = InputState::new();
    assert_eq!(input.position(), (0.5, 0.5));

    assert_eq!(input.on_pointer_move(256.0, 768.0, 1024.0, 1024.0), (0.25, 0.75));
    assert_eq!(input.on_pointer_move(0.0, 0.0, 800.0, 600.0), (0.0, 0.0));
}

#[test]
fn pointer_outside_window_is_clamped() {
    let mut input = InputState::new();
    assert_eq!(input.on_pointer_move(-50.0, 2000.0, 1000.0, 1000.0), (0.0, 1.0));
}

#[test]
fn pointer_in_empty_viewport_is_ignored() {
    let mut input = InputState::new();
    input.on_pointer_move(100.0, 100.0, 400.0, 400.0);
    assert_eq!(input.on_pointer_move(10.0, 10.0, 0.0, 0.0), (0.25, 0.25));
}

// ============================================================================
// Orientation Input
// ============================================================================

#[test]
fn first_orientation_only_sets_baseline() {
    let mut input = InputState::new();
    let reading = Orientation { beta: 40.0, gamma: -10.0 };
    assert_eq!(input.on_orientation(reading), None);
    assert_eq!(input.position(), (0.5, 0.5));
}

#[test]
fn orientation_deltas_accumulate() {
    let mut input = InputState::new();
    input.on_orientation(Orientation { beta: 0.0, gamma: 0.0 });

    // 60° of gamma spans x, 30° of beta spans y
    let (x, y) = input.on_orientation(Orientation { beta: 7.5, gamma: 15.0 }).unwrap();
    assert!((x - 0.75).abs() < EPSILON);
    assert!((y - 0.75).abs() < EPSILON);

    let (x, y) = input.on_orientation(Orientation { beta: 0.0, gamma: 0.0 }).unwrap();
    assert!((x - 0.5).abs() < EPSILON);
    assert!((y - 0.5).abs() < EPSILON);
}

#[test]
fn orientation_is_clamped() {
    let mut input = InputState::new();
    input.on_orientation(Orientation { beta: 0.0, gamma: 0.0 });
    let position = input.on_orientation(Orientation { beta: -90.0, gamma: 90.0 });
    assert_eq!(position, Some((1.0, 0.0)));
}
