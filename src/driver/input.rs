//! Host input mapping.
//!
//! Translates pointer positions and device orientation readings into the
//! normalized `(x, y) ∈ [0, 1]²` the renderer consumes.

/// Degrees of gamma (left/right tilt) per unit of `x`.
const GAMMA_RANGE: f32 = 60.0;
/// Degrees of beta (front/back tilt) per unit of `y`.
const BETA_RANGE: f32 = 30.0;

/// A device orientation reading, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub beta: f32,
    pub gamma: f32,
}

/// Last known input position.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    x: f32,
    y: f32,
    previous_orientation: Option<Orientation>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            previous_orientation: None,
        }
    }
}

impl InputState {
    /// Starts centered at `(0.5, 0.5)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Cursor at `(px, py)` inside a `width × height` viewport.
    pub fn on_pointer_move(&mut self, px: f32, py: f32, width: f32, height: f32) -> (f32, f32) {
        if width > 0.0 && height > 0.0 {
            self.x = (px / width).clamp(0.0, 1.0);
            self.y = (py / height).clamp(0.0, 1.0);
        }
        self.position()
    }

    /// Accumulates the change since the previous reading.
    ///
    /// The first reading only records the baseline and returns `None`; later
    /// readings return the updated position.
    pub fn on_orientation(&mut self, orientation: Orientation) -> Option<(f32, f32)> {
        let previous = self.previous_orientation.replace(orientation)?;
        self.x = (self.x + (orientation.gamma - previous.gamma) / GAMMA_RANGE).clamp(0.0, 1.0);
        self.y = (self.y + (orientation.beta - previous.beta) / BETA_RANGE).clamp(0.0, 1.0);
        Some(self.position())
    }
}
