use std::fmt;

use serde::Serialize;

/// A strictly positive, finite trade price.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Self {
        assert!(value.is_finite(), "price must be finite");
        assert!(value > 0.0, "price must be positive");

        Price(value)
    }

    /// `None` for zero, negative or non-finite values, which the feed uses for garbage ticks.
    pub fn try_new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Price(value))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.4}", self.0)
    }
}
