use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ceiling on the tie-break perturbation, in composite points.
pub const MAX_JITTER_POINTS: f64 = 5.0;

/// Injectable tie-break randomness.
///
/// The perturbation only exists to separate near-identical rankings, so it
/// must be possible to switch it off (unit tests, reproducible output) or
/// seed it, rather than reaching for a global RNG.
#[derive(Debug)]
pub enum JitterSource {
    Disabled,
    Rng(Mutex<StdRng>),
}

impl JitterSource {
    pub fn disabled() -> Self {
        Self::Disabled
    }

    pub fn seeded(seed: u64) -> Self {
        Self::Rng(Mutex::new(StdRng::seed_from_u64(seed)))
    }

    pub fn from_entropy() -> Self {
        Self::Rng(Mutex::new(StdRng::from_entropy()))
    }

    /// Next perturbation in `[0, amplitude]`, with the amplitude capped at
    /// [`MAX_JITTER_POINTS`]. Always 0 when disabled.
    pub fn next(&self, amplitude: f64) -> f64 {
        let amplitude = amplitude.clamp(0.0, MAX_JITTER_POINTS);
        match self {
            Self::Disabled => 0.0,
            Self::Rng(rng) => {
                if amplitude == 0.0 {
                    return 0.0;
                }
                let mut guard = rng.lock().expect("jitter rng mutex poisoned");
                guard.gen_range(0.0..=amplitude)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_source_is_always_zero() {
        let source = JitterSource::disabled();
        for _ in 0..32 {
            assert_eq!(source.next(5.0), 0.0);
        }
    }

    #[test]
    fn values_stay_within_the_capped_amplitude() {
        let source = JitterSource::seeded(7);
        for _ in 0..256 {
            let value = source.next(50.0);
            assert!((0.0..=MAX_JITTER_POINTS).contains(&value));
        }
    }

    #[test]
    fn seeded_sources_replay_the_same_sequence() {
        let a = JitterSource::seeded(42);
        let b = JitterSource::seeded(42);
        let first: Vec<f64> = (0..8).map(|_| a.next(5.0)).collect();
        let second: Vec<f64> = (0..8).map(|_| b.next(5.0)).collect();
        assert_eq!(first, second);
    }
}
