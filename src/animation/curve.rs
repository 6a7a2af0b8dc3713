//! Keyframe curves.
//!
//! A [`Curve`] is the scalar animation function the exporter writes for every
//! animated component (one curve for `location.x`, one for `location.y`, ...).
//! Keyframes carry Blender-style interpolation modes and Bézier handles in
//! (frame, value) space.
//!
//! Sampling is a pure function of `(curve, time)`. Outside the keyframe range the
//! curve holds its boundary value.

use glam::Vec2;

/// Number of bisection steps used to invert the time component of a Bézier segment.
const BEZIER_SOLVE_ITERATIONS: usize = 32;
const BEZIER_SOLVE_EPSILON: f32 = 1e-6;

/// Interpolation mode of the segment that starts at a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Hold the left keyframe's value until the next keyframe.
    Constant,
    /// Straight line between the two keyframe values.
    Linear,
    /// Cubic Bézier through the keyframes and their handles.
    Bezier,
}

impl Interpolation {
    /// Maps the exporter's interpolation name. Unknown easing presets fall back to
    /// Bézier, which is what they are built on.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "CONSTANT" => Interpolation::Constant,
            "LINEAR" => Interpolation::Linear,
            "BEZIER" => Interpolation::Bezier,
            other => {
                log::warn!("Unsupported keyframe interpolation '{other}', using BEZIER");
                Interpolation::Bezier
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Keyframe position as (frame, value).
    pub co: Vec2,
    pub handle_left: Vec2,
    pub handle_right: Vec2,
    pub interpolation: Interpolation,
}

impl Keyframe {
    /// A keyframe whose handles sit on the keyframe itself.
    #[must_use]
    pub fn new(time: f32, value: f32, interpolation: Interpolation) -> Self {
        let co = Vec2::new(time, value);
        Self {
            co,
            handle_left: co,
            handle_right: co,
            interpolation,
        }
    }

    #[must_use]
    pub fn with_handles(mut self, left: Vec2, right: Vec2) -> Self {
        self.handle_left = left;
        self.handle_right = right;
        self
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.co.x
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.co.y
    }
}

/// An ordered, non-empty keyframe sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    keyframes: Vec<Keyframe>,
}

impl Curve {
    /// Builds a curve, sorting keyframes by time. Returns `None` for an empty list.
    #[must_use]
    pub fn new(mut keyframes: Vec<Keyframe>) -> Option<Self> {
        if keyframes.is_empty() {
            return None;
        }
        keyframes.sort_by(|a, b| a.time().total_cmp(&b.time()));
        Some(Self { keyframes })
    }

    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// First and last keyframe times.
    #[must_use]
    pub fn time_range(&self) -> (f32, f32) {
        let first = self.keyframes[0].time();
        let last = self.keyframes[self.keyframes.len() - 1].time();
        (first, last)
    }

    /// Evaluates the curve at `time`.
    #[must_use]
    pub fn sample(&self, time: f32) -> f32 {
        let keys = &self.keyframes;
        let first = &keys[0];
        let last = &keys[keys.len() - 1];

        if keys.len() == 1 || time <= first.time() {
            return first.value();
        }
        if time >= last.time() {
            return last.value();
        }

        // partition_point gives the first keyframe strictly after `time`
        let next = keys.partition_point(|k| k.time() <= time);
        let k0 = &keys[next - 1];
        let k1 = &keys[next];

        let dt = k1.time() - k0.time();
        if dt <= f32::EPSILON {
            return k1.value();
        }

        match k0.interpolation {
            Interpolation::Constant => k0.value(),
            Interpolation::Linear => {
                let t = (time - k0.time()) / dt;
                k0.value() + (k1.value() - k0.value()) * t
            }
            Interpolation::Bezier => sample_bezier_segment(k0, k1, time),
        }
    }
}

/// Free-function form of [`Curve::sample`].
#[inline]
#[must_use]
pub fn sample(curve: &Curve, time: f32) -> f32 {
    curve.sample(time)
}

#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Shrinks the handles of a segment so its time component stays monotonic.
///
/// Same correction the modeling tool applies before evaluating: when the handle
/// time offsets together exceed the segment length, both handles are scaled by
/// the same factor towards their keyframes.
fn correct_handles(p0: Vec2, mut p1: Vec2, mut p2: Vec2, p3: Vec2) -> (Vec2, Vec2) {
    let h1 = p0 - p1;
    let h2 = p3 - p2;
    let len = p3.x - p0.x;
    let len1 = h1.x.abs();
    let len2 = h2.x.abs();

    if len1 + len2 > len && len1 + len2 > 0.0 {
        let fac = len / (len1 + len2);
        p1 = p0 - h1 * fac;
        p2 = p3 - h2 * fac;
    }

    p1.x = p1.x.clamp(p0.x, p3.x);
    p2.x = p2.x.clamp(p0.x, p3.x);
    (p1, p2)
}

fn sample_bezier_segment(k0: &Keyframe, k1: &Keyframe, time: f32) -> f32 {
    let p0 = k0.co;
    let p3 = k1.co;
    let (p1, p2) = correct_handles(p0, k0.handle_right, k1.handle_left, p3);

    // Bisection on the (monotonic) time polynomial
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = (time - p0.x) / (p3.x - p0.x);
    for _ in 0..BEZIER_SOLVE_ITERATIONS {
        let x = cubic_bezier(p0.x, p1.x, p2.x, p3.x, mid);
        if (x - time).abs() < BEZIER_SOLVE_EPSILON {
            break;
        }
        if x < time {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }

    cubic_bezier(p0.y, p1.y, p2.y, p3.y, mid)
}
