//! Random draws for arrivals, diversions and drops
//!
//! Every probabilistic decision goes through [`Dice`] so runs can be seeded
//! and tests can script exact outcomes.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`
pub trait Dice: Send {
    fn roll(&mut self) -> f64;
}

impl Dice for StdRng {
    fn roll(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Seeded dice when `seed` is set, OS-seeded otherwise
pub fn dice_from_seed(seed: Option<u64>) -> Box<dyn Dice> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_os_rng()),
    }
}

/// Dice that replays a fixed sequence, then repeats a fallback value
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
        }
    }

    /// Dice that always rolls `value`
    pub fn always(value: f64) -> Self {
        Self::new([], value)
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}
