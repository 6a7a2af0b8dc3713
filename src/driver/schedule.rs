/// Deterministic scrub schedule for offline rendering.
///
/// Sweeps `y` from 0 to 1 over `frames` values, then back to 0 over
/// `frames - 1` more, so the sequence loops without a repeated end frame:
///
/// ```text
/// frames = 4:  0, 1/3, 2/3, 1, 2/3, 1/3, 0
/// ```
#[derive(Debug, Clone)]
pub struct PingPong {
    frames: usize,
    index: usize,
}

impl PingPong {
    #[must_use]
    pub fn new(frames: usize) -> Self {
        Self { frames, index: 0 }
    }

    /// Total number of values, `2 · frames − 1`.
    #[must_use]
    pub fn total(frames: usize) -> usize {
        (2 * frames).saturating_sub(1)
    }

    fn value_at(&self, i: usize) -> f32 {
        if self.frames <= 1 {
            return 0.0;
        }
        let last = (self.frames - 1) as f32;
        if i < self.frames {
            i as f32 / last
        } else {
            (2 * (self.frames - 1) - i) as f32 / last
        }
    }
}

impl Iterator for PingPong {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= Self::total(self.frames) {
            return None;
        }
        let value = self.value_at(self.index);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = Self::total(self.frames) - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PingPong {}

/// The full schedule as a vector.
#[must_use]
pub fn ping_pong_schedule(frames: usize) -> Vec<f32> {
    PingPong::new(frames).collect()
}
