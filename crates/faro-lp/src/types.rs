//! Shared value types for the LP backend.

/// Lower/upper bound pair for one variable position.
///
/// Infinite sides mean "unbounded"; both sides infinite is a free variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Free variable, unbounded on both sides.
    pub fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// A bound pair is usable when neither side is NaN and the sides do not
    /// cross.
    pub fn is_valid(self) -> bool {
        !self.lower.is_nan() && !self.upper.is_nan() && self.lower <= self.upper
    }
}
