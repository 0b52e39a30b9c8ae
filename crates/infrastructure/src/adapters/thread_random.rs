//! Random number adapters

use std::sync::{Mutex, PoisonError};

use ile_application::ports::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl ThreadRandom {
    /// Creates a new thread random source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRandom {
    fn random_int(&self, min: i64, max: i64) -> i64 {
        rand::rng().random_range(min..=max)
    }
}

/// Reproducible random source for previews and tests.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Creates a source that yields the same sequence for the same seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn random_int(&self, min: i64, max: i64) -> i64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_stays_in_range() {
        let random = ThreadRandom::new();
        for _ in 0..200 {
            let n = random.random_int(-3, 3);
            assert!((-3..=3).contains(&n));
        }
        assert_eq!(random.random_int(5, 5), 5);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let first: Vec<_> = (0..10).map(|_| a.random_int(1, 1_000)).collect();
        let second: Vec<_> = (0..10).map(|_| b.random_int(1, 1_000)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|n| (1..=1_000).contains(n)));
    }
}
