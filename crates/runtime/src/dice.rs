//! [`Dice`] backed by the `rand` crate.

use fray_core::rng::Dice;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// OS-seeded (or fixed-seed) generator handed to rule operations.
#[derive(Clone, Debug)]
pub struct RandDice {
    rng: StdRng,
}

impl RandDice {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Dice for RandDice {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}
