//! Dice generation and index-based dice selection.
//!
//! A `DiceSource` is the only external input the rules consume. Two sources
//! ship with the crate: a seedable PRNG stream and a scripted stream for tests
//! and replays.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// Number of dice in a full set (first roll of a turn and hot-dice rerolls).
pub const MAX_DICE: usize = 6;

/// Ordered faces of one roll. Order only matters for index-based selection.
pub type DiceRoll = Vec<u8>;

/// Produces dice faces on demand.
///
/// Contract: `roll(n)` returns `n` faces, each in 1..=6. `roll(0)` returns an
/// empty roll.
pub trait DiceSource {
    fn roll(&mut self, n: usize) -> DiceRoll;
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll(&mut self, n: usize) -> DiceRoll {
        (**self).roll(n)
    }
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn roll(&mut self, n: usize) -> DiceRoll {
        (**self).roll(n)
    }
}

/// Pseudorandom dice backed by a small PRNG.
pub struct RandomDice {
    rng: ChaCha8Rng,
}

impl RandomDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self, n: usize) -> DiceRoll {
        (0..n).map(|_| self.rng.gen_range(1..=6)).collect()
    }
}

/// Replays queued rolls in order; once the queue is empty every roll is all 1s.
///
/// Queued rolls are returned as-is, whatever `n` is asked for, so a test can
/// force any hand (including short or empty ones).
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    queue: VecDeque<DiceRoll>,
}

impl ScriptedDice {
    pub fn new<I>(rolls: I) -> Self
    where
        I: IntoIterator<Item = DiceRoll>,
    {
        Self {
            queue: rolls.into_iter().collect(),
        }
    }

    pub fn push(&mut self, roll: DiceRoll) {
        self.queue.push_back(roll);
    }

    /// Number of queued rolls not yet consumed.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, n: usize) -> DiceRoll {
        self.queue.pop_front().unwrap_or_else(|| vec![1; n])
    }
}

/// Keep only in-range, first-seen indices, in caller order.
fn valid_indices(roll_len: usize, indices: &[usize]) -> Vec<usize> {
    let mut seen = vec![false; roll_len];
    let mut out = Vec::with_capacity(indices.len().min(roll_len));
    for &i in indices {
        if i < roll_len && !seen[i] {
            seen[i] = true;
            out.push(i);
        }
    }
    out
}

/// Map selected positions to die faces.
///
/// Out-of-range indices are ignored, duplicates collapse to one die, and the
/// caller's index order is preserved.
pub fn select_dice(roll: &[u8], indices: &[usize]) -> DiceRoll {
    valid_indices(roll.len(), indices)
        .into_iter()
        .map(|i| roll[i])
        .collect()
}

/// Dice left over after a selection, in original roll order.
pub fn remaining_dice(roll: &[u8], indices: &[usize]) -> DiceRoll {
    let kept = valid_indices(roll.len(), indices);
    roll.iter()
        .enumerate()
        .filter(|(i, _)| !kept.contains(i))
        .map(|(_, &d)| d)
        .collect()
}
