use crate::execution::order_intent::Side;

/// Authoritative position snapshot as reported by the venue.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionRecord {
    /// Signed quantity. Positive = long, negative = short.
    pub quantity: i64,
    /// Average price of the open quantity, 0 when flat.
    pub open_average_price: f64,
}

impl PositionRecord {
    pub fn new(quantity: i64, open_average_price: f64) -> Self {
        Self {
            quantity,
            open_average_price,
        }
    }

    pub fn apply_fill(self, side: Side, quantity: u64, price: f64) -> Self {
        let delta = side.sign() * quantity as i64;
        let updated = self.quantity + delta;

        let open_average_price = if updated == 0 {
            0.0
        } else if self.quantity == 0 || self.quantity.signum() == delta.signum() {
            let held = self.quantity.unsigned_abs() as f64;
            let added = delta.unsigned_abs() as f64;
            (self.open_average_price * held + price * added) / (held + added)
        } else if self.quantity.signum() == updated.signum() {
            self.open_average_price
        } else {
            price
        };

        Self {
            quantity: updated,
            open_average_price,
        }
    }
}
