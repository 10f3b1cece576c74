//! Selection engine
//!
//! Picks one entrant uniformly at random. Every draw samples the whole pool;
//! previous winners are never excluded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RaffleError;

/// Pick a uniformly random element of `pool`.
pub fn select<'a, T, R>(pool: &'a [T], rng: &mut R) -> Result<&'a T, RaffleError>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return Err(RaffleError::EmptyPool);
    }
    let index = rng.gen_range(0..pool.len());
    Ok(&pool[index])
}

/// Owns the random source used for every draw of a session.
#[derive(Debug)]
pub struct Selector<R = StdRng> {
    rng: R,
}

impl Selector<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of draws.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Selector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn select<'a, T>(&mut self, pool: &'a [T]) -> Result<&'a T, RaffleError> {
        select(pool, &mut self.rng)
    }
}
