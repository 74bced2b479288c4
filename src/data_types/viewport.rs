use serde::{Deserialize, Serialize};

/// Visible time window in epoch milliseconds. `None` at the call sites means
/// "full data extent".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub min: i64,
    pub max: i64,
}

impl Viewport {
    /// Builds a window, swapping the edges if they arrive reversed.
    pub fn new(min: i64, max: i64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn span(&self) -> i64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.min && timestamp <= self.max
    }

    /// Clamps each edge independently into `bounds`. The width may shrink.
    pub fn clamp_edges(&self, bounds: Viewport) -> Viewport {
        Viewport::new(
            self.min.clamp(bounds.min, bounds.max),
            self.max.clamp(bounds.min, bounds.max),
        )
    }

    /// Shifts the window back inside `bounds` keeping its width.
    /// A window wider than `bounds` becomes `bounds`.
    pub fn shift_into(&self, bounds: Viewport) -> Viewport {
        let span = self.span();
        if span >= bounds.span() {
            return bounds;
        }
        if self.min < bounds.min {
            Viewport::new(bounds.min, bounds.min + span)
        } else if self.max > bounds.max {
            Viewport::new(bounds.max - span, bounds.max)
        } else {
            *self
        }
    }

    /// Union of two windows.
    pub fn union(&self, other: Viewport) -> Viewport {
        Viewport::new(self.min.min(other.min), self.max.max(other.max))
    }
}
