//! Uniform randomness source shared by the lottery, the resolver, and code
//! generation.
//!
//! Every consumer draws from a [`UniformSource`] rather than a global RNG so
//! tests can substitute a seeded or scripted stream and replay draws exactly.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait UniformSource: Send + Sync {
    /// Draw one sample in `[0, 1)`.
    fn next_unit(&self) -> f64;

    /// Pick an index in `0..len` from exactly one sample.
    ///
    /// Returns `None` for an empty range without consuming a sample.
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let sample = self.next_unit().clamp(0.0, 1.0);
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss,
            reason = "sample is in [0, 1] so the product is within 0..=len"
        )]
        let index = (sample * len as f64).floor() as usize;
        Some(index.min(len - 1))
    }
}

/// Thread-local RNG backed source used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl UniformSource for ThreadRngSource {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Reproducible source seeded from a fixed value.
///
/// # Examples
/// ```
/// use gacha_backend::domain::{SeededUniformSource, UniformSource};
///
/// let a = SeededUniformSource::new(7);
/// let b = SeededUniformSource::new(7);
/// assert_eq!(a.next_unit(), b.next_unit());
/// ```
#[derive(Debug)]
pub struct SeededUniformSource {
    rng: Mutex<StdRng>,
}

impl SeededUniformSource {
    /// Build a source from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl UniformSource for SeededUniformSource {
    fn next_unit(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.r#gen::<f64>(),
            Err(poisoned) => poisoned.into_inner().r#gen::<f64>(),
        }
    }
}

/// Source replaying a fixed script of samples, then repeating the fallback.
///
/// Useful for pinning exact lottery outcomes.
#[derive(Debug)]
pub struct ScriptedUniformSource {
    samples: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl ScriptedUniformSource {
    /// Replay `samples` in order, then return `0.5` forever.
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self::with_fallback(samples, 0.5)
    }

    /// Replay `samples` in order, then return `fallback` forever.
    pub fn with_fallback(samples: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            samples: Mutex::new(samples.into_iter().collect()),
            fallback,
        }
    }

    /// Number of scripted samples not yet consumed.
    pub fn remaining(&self) -> usize {
        self.samples.lock().map_or(0, |samples| samples.len())
    }
}

impl UniformSource for ScriptedUniformSource {
    fn next_unit(&self) -> f64 {
        self.samples
            .lock()
            .ok()
            .and_then(|mut samples| samples.pop_front())
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 4, 0)]
    #[case(0.24, 4, 0)]
    #[case(0.25, 4, 1)]
    #[case(0.999, 4, 3)]
    #[case(1.0, 4, 3)]
    fn pick_index_partitions_unit_interval(
        #[case] sample: f64,
        #[case] len: usize,
        #[case] expected: usize,
    ) {
        let source = ScriptedUniformSource::new([sample]);
        assert_eq!(source.pick_index(len), Some(expected));
    }

    #[test]
    fn pick_index_on_empty_range_consumes_nothing() {
        let source = ScriptedUniformSource::new([0.3]);
        assert_eq!(source.pick_index(0), None);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let a = SeededUniformSource::new(42);
        let b = SeededUniformSource::new(42);
        let left: Vec<f64> = (0..5).map(|_| a.next_unit()).collect();
        let right: Vec<f64> = (0..5).map(|_| b.next_unit()).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|value| (0.0..1.0).contains(value)));
    }
}
