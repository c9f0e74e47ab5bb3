use rand::Rng;

pub const DEFAULT_MIN_MS: u64 = 3_000;
pub const DEFAULT_MAX_MS: u64 = 9_000;

/// Uniform random gap in `[min_ms, max_ms)` between scheduling decisions.
#[derive(Debug)]
pub struct ReevaluationInterval<R> {
    rng: R,
    min_ms: u64,
    max_ms: u64,
}

impl<R: Rng> ReevaluationInterval<R> {
    pub fn new(rng: R, min_ms: u64, max_ms: u64) -> Self {
        Self { rng, min_ms, max_ms }
    }

    pub fn next_gap_ms(&mut self) -> u64 {
        if self.max_ms <= self.min_ms {
            return self.min_ms;
        }

        self.rng.random_range(self.min_ms..self.max_ms)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn gaps_stay_in_range() {
        let mut interval =
            ReevaluationInterval::new(StdRng::seed_from_u64(42), DEFAULT_MIN_MS, DEFAULT_MAX_MS);

        for _ in 0..1_000 {
            let gap = interval.next_gap_ms();
            assert!((3_000..9_000).contains(&gap));
        }
    }

    #[test]
    fn same_seed_same_gaps() {
        let mut a = ReevaluationInterval::new(StdRng::seed_from_u64(1), 3_000, 9_000);
        let mut b = ReevaluationInterval::new(StdRng::seed_from_u64(1), 3_000, 9_000);

        for _ in 0..20 {
            assert_eq!(a.next_gap_ms(), b.next_gap_ms());
        }
    }

    #[test]
    fn collapsed_range_is_fixed_gap() {
        let mut interval = ReevaluationInterval::new(StdRng::seed_from_u64(1), 5_000, 5_000);

        assert_eq!(interval.next_gap_ms(), 5_000);
    }
}
