//! Deterministic draw streams
//!
//! Each block after genesis consumes exactly one uniform `u64`.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of per-block random draws
pub trait DrawSource {
    /// Next uniform 64-bit value
    fn next_draw(&mut self) -> u64;
}

impl<T: DrawSource + ?Sized> DrawSource for &mut T {
    fn next_draw(&mut self) -> u64 {
        (**self).next_draw()
    }
}

/// Seeded pseudorandom stream; identical seeds give identical chains
#[derive(Debug, Clone)]
pub struct SeededDraws {
    rng: ChaCha8Rng,
}

impl SeededDraws {
    /// Stream seeded once with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DrawSource for SeededDraws {
    fn next_draw(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Replays a fixed list of draws, then `u64::MAX` (a skip of one) forever
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    draws: std::vec::IntoIter<u64>,
}

impl ScriptedDraws {
    /// Stream yielding `draws` in order
    pub fn new(draws: impl IntoIterator<Item = u64>) -> Self {
        Self {
            draws: draws.into_iter().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl DrawSource for ScriptedDraws {
    fn next_draw(&mut self) -> u64 {
        self.draws.next().unwrap_or(u64::MAX)
    }
}
