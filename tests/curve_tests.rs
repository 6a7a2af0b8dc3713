//! Curve Sampler Tests
//!
//! Tests for:
//! - Constant / linear / Bézier segment evaluation
//! - Hold extrapolation outside the keyframe range
//! - Continuity at keyframes
//! - Handle correction for overshooting Bézier handles

use glam::Vec2;

use timepiece::animation::{Curve, Interpolation, Keyframe, sample};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn linear(points: &[(f32, f32)]) -> Curve {
    Curve::new(
        points
            .iter()
            .map(|&(t, v)| Keyframe::new(t, v, Interpolation::Linear))
            .collect(),
    )
    .unwrap()
}

/// Bézier keyframe with horizontal handles one third of the way to its neighbors.
fn smooth_key(t: f32, v: f32, reach: f32) -> Keyframe {
    Keyframe::new(t, v, Interpolation::Bezier)
        .with_handles(Vec2::new(t - reach, v), Vec2::new(t + reach, v))
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn empty_curve_is_rejected() {
    assert!(Curve::new(Vec::new()).is_none());
}

#[test]
fn keyframes_are_sorted_by_time() {
    let curve = Curve::new(vec![
        Keyframe::new(10.0, 1.0, Interpolation::Linear),
        Keyframe::new(0.0, 0.0, Interpolation::Linear),
    ])
    .unwrap();

    assert_eq!(curve.time_range(), (0.0, 10.0));
    assert!(approx(curve.sample(5.0), 0.5));
}

#[test]
fn unknown_interpolation_falls_back_to_bezier() {
    assert_eq!(Interpolation::from_name("LINEAR"), Interpolation::Linear);
    assert_eq!(Interpolation::from_name("CONSTANT"), Interpolation::Constant);
    assert_eq!(Interpolation::from_name("BOUNCE"), Interpolation::Bezier);
}

// ============================================================================
// Segment Evaluation
// ============================================================================

#[test]
fn single_keyframe_is_constant_everywhere() {
    let curve = linear(&[(4.0, 2.5)]);
    for t in [-100.0, 0.0, 4.0, 7.0, 1000.0] {
        assert!(approx(curve.sample(t), 2.5), "t={t}");
    }
}

#[test]
fn linear_midpoint() {
    let curve = linear(&[(0.0, 0.0), (10.0, 20.0)]);
    let val = sample(&curve, 2.5);
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn constant_holds_left_value() {
    let curve = Curve::new(vec![
        Keyframe::new(0.0, 1.0, Interpolation::Constant),
        Keyframe::new(10.0, 5.0, Interpolation::Linear),
    ])
    .unwrap();

    assert!(approx(curve.sample(0.0), 1.0));
    assert!(approx(curve.sample(9.99), 1.0));
    assert!(approx(curve.sample(10.0), 5.0));
}

#[test]
fn bezier_with_flat_handles_eases_in_and_out() {
    let curve = Curve::new(vec![smooth_key(0.0, 0.0, 10.0 / 3.0), smooth_key(10.0, 1.0, 10.0 / 3.0)])
        .unwrap();

    assert!(approx(curve.sample(5.0), 0.5));
    assert!(curve.sample(2.5) < 0.25, "ease-in should lag the linear ramp");
    assert!(curve.sample(7.5) > 0.75, "ease-out should lead the linear ramp");
}

#[test]
fn bezier_is_monotonic_between_flat_keys() {
    let curve = Curve::new(vec![smooth_key(0.0, 0.0, 3.0), smooth_key(10.0, 4.0, 3.0)]).unwrap();

    let mut previous = curve.sample(0.0);
    for step in 1..=100 {
        let value = curve.sample(step as f32 * 0.1);
        assert!(value + EPSILON >= previous, "step {step}: {value} < {previous}");
        previous = value;
    }
}

#[test]
fn bezier_with_overshooting_handles_stays_finite() {
    // Handles reach past the neighboring keyframe and get scaled back
    let curve = Curve::new(vec![smooth_key(0.0, 0.0, 25.0), smooth_key(10.0, 1.0, 25.0)]).unwrap();

    for step in 0..=20 {
        let value = curve.sample(step as f32 * 0.5);
        assert!(value.is_finite());
        assert!((-EPSILON..=1.0 + EPSILON).contains(&value), "value {value} left [0, 1]");
    }
}

// ============================================================================
// Continuity and Extrapolation
// ============================================================================

#[test]
fn hold_extrapolation_before_and_after() {
    let curve = linear(&[(1.0, 3.0), (50.0, 7.0)]);

    assert!(approx(curve.sample(-10.0), 3.0));
    assert!(approx(curve.sample(1.0), 3.0));
    assert!(approx(curve.sample(50.0), 7.0));
    assert!(approx(curve.sample(500.0), 7.0));
}

#[test]
fn continuous_at_interior_keyframes() {
    let curve = Curve::new(vec![
        smooth_key(0.0, 0.0, 1.0),
        Keyframe::new(5.0, 2.0, Interpolation::Bezier)
            .with_handles(Vec2::new(4.0, 1.5), Vec2::new(6.0, 2.5)),
        Keyframe::new(10.0, -1.0, Interpolation::Linear),
        Keyframe::new(12.0, 0.0, Interpolation::Linear),
    ])
    .unwrap();

    for key in curve.keyframes() {
        let t = key.time();
        let at = curve.sample(t);
        assert!(approx(at, key.value()), "t={t}: {at} != {}", key.value());
        assert!((curve.sample(t - 1e-3) - at).abs() < 1e-2, "left jump at t={t}");
        assert!((curve.sample(t + 1e-3) - at).abs() < 1e-2, "right jump at t={t}");
    }
}
