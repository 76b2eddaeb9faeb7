//! Seedable Xorshift64 generator used for jitter, mass, scatter, connection
//! and activation draws.
//!
//! A field owns its own generator, so two fields built from the same seed
//! evolve identically frame for frame. That is what makes offline snapshots
//! and tests reproducible; the browser host seeds from the clock.

use serde::{Deserialize, Serialize};

/// Xorshift64 (shifts 13, 7, 17). A zero seed is replaced by a fixed
/// non-zero constant since zero is a fixed point of the recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max). Returns `min` when `min == max`; a
    /// reversed range (`min > max`) yields values in `(max, min]`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Symmetric jitter in [-spread/2, spread/2).
    pub fn jitter(&mut self, spread: f64) -> f64 {
        self.next_f64() * spread - spread / 2.0
    }

    /// Returns true with probability `p`.
    ///
    /// Always consumes exactly one draw so the sequence stays aligned no
    /// matter which probabilities a configuration uses.
    pub fn chance(&mut self, p: f64) -> bool {
        let draw = self.next_f64();
        if p >= 1.0 {
            true
        } else {
            draw < p
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_range_degenerate_and_reversed() {
        let mut rng = Xorshift64::new(11);
        assert_eq!(rng.next_range(5.0, 5.0), 5.0);
        for _ in 0..1000 {
            let v = rng.next_range(3.0, 1.0);
            assert!(v > 1.0 && v <= 3.0, "got {v}");
        }
    }

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Snapshots stored as seed files depend on this sequence.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at {i}");
        }
    }

    #[test]
    fn jitter_is_centered_on_zero() {
        let mut rng = Xorshift64::new(31);
        for _ in 0..10_000 {
            let j = rng.jitter(40.0);
            assert!((-20.0..20.0).contains(&j), "jitter {j} outside +/-20");
        }
        assert_eq!(rng.jitter(0.0), 0.0);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..1000 {
            assert!(rng.chance(1.0));
            assert!(!rng.chance(0.0));
        }
    }

    #[test]
    fn chance_rate_is_close_to_probability() {
        let mut rng = Xorshift64::new(1234);
        let hits = (0..100_000).filter(|_| rng.chance(0.25)).count();
        let rate = hits as f64 / 100_000.0;
        assert!((rate - 0.25).abs() < 0.01, "observed rate {rate}");
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_range_in_bounds(
                seed: u64,
                min in -1e6_f64..1e6,
                width in 1e-3_f64..1e6,
            ) {
                let max = min + width;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "{v} outside [{min}, {max})");
                }
            }
        }
    }
}
