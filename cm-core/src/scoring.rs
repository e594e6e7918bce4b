//! Hand scoring for Cinq Mille.
//!
//! Combinations are consumed in a fixed priority order; dice used by one
//! combination are never scored again by a later one.
//!
//! 1. five or more 1s / five or more 5s (short-circuit, whole hand)
//! 2. three 1s
//! 3. full (triple A + pair B, A != B), at most once
//! 4. straight 1-5, else straight 2-6
//! 5. remaining triples of 2..=6
//! 6. single 1s and 5s

use thiserror::Error;

pub const SCORE_ONE: u32 = 100;
pub const SCORE_FIVE: u32 = 50;
pub const SCORE_THREE_ONES: u32 = 1000;
pub const SCORE_STRAIGHT: u32 = 500;
pub const SCORE_FIVE_ONES: u32 = 5000;
pub const SCORE_FIVE_FIVES: u32 = 5000;

/// Value of a triple of `face` for faces 2..=6 (three 1s use `SCORE_THREE_ONES`).
pub const fn triple_score(face: u8) -> u32 {
    face as u32 * 100
}

/// Value of a full made of a triple of `triple` and a pair of `pair`.
pub const fn full_score(triple: u8, pair: u8) -> u32 {
    triple as u32 * pair as u32 * 100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("die {index} shows {face}; faces must be in 1..=6")]
    InvalidFace { face: u8, index: usize },
}

/// Multiset of faces still available for scoring.
#[derive(Debug, Clone, Copy)]
struct Hand {
    /// counts[face], index 0 unused.
    counts: [u8; 7],
    len: usize,
}

impl Hand {
    fn from_dice(dice: &[u8]) -> Result<Self, ScoreError> {
        let mut counts = [0u8; 7];
        for (index, &face) in dice.iter().enumerate() {
            if !(1..=6).contains(&face) {
                return Err(ScoreError::InvalidFace { face, index });
            }
            counts[face as usize] = counts[face as usize].saturating_add(1);
        }
        Ok(Self {
            counts,
            len: dice.len(),
        })
    }

    #[inline]
    fn count(&self, face: u8) -> u8 {
        self.counts[face as usize]
    }

    fn take(&mut self, face: u8, n: u8) {
        debug_assert!(self.count(face) >= n);
        self.counts[face as usize] -= n;
        self.len -= n as usize;
    }

    fn has_all(&self, faces: std::ops::RangeInclusive<u8>) -> bool {
        faces.into_iter().all(|f| self.count(f) >= 1)
    }

    fn take_each(&mut self, faces: std::ops::RangeInclusive<u8>) {
        for f in faces {
            self.take(f, 1);
        }
    }

    /// Lowest triple value first, then lowest pair value.
    fn take_full(&mut self) -> u32 {
        if self.len < 5 {
            return 0;
        }
        for triple in 1u8..=6 {
            if self.count(triple) < 3 {
                continue;
            }
            for pair in 1u8..=6 {
                if pair != triple && self.count(pair) >= 2 {
                    self.take(triple, 3);
                    self.take(pair, 2);
                    return full_score(triple, pair);
                }
            }
        }
        0
    }

    fn take_straight(&mut self) -> u32 {
        if self.len < 5 {
            return 0;
        }
        if self.has_all(1..=5) {
            self.take_each(1..=5);
            return SCORE_STRAIGHT;
        }
        if self.has_all(2..=6) {
            self.take_each(2..=6);
            return SCORE_STRAIGHT;
        }
        0
    }
}

/// Compute the point value of a hand.
///
/// - Order of `dice` does not matter.
/// - An empty hand scores 0.
/// - Any face outside 1..=6 is rejected.
pub fn calculate_score(dice: &[u8]) -> Result<u32, ScoreError> {
    let mut hand = Hand::from_dice(dice)?;
    if hand.len == 0 {
        return Ok(0);
    }

    if hand.count(1) >= 5 {
        return Ok(SCORE_FIVE_ONES);
    }
    if hand.count(5) >= 5 {
        return Ok(SCORE_FIVE_FIVES);
    }

    let mut score = 0u32;

    if hand.count(1) >= 3 {
        hand.take(1, 3);
        score += SCORE_THREE_ONES;
    }

    score += hand.take_full();
    score += hand.take_straight();

    for face in (2u8..=6).rev() {
        if hand.count(face) >= 3 {
            hand.take(face, 3);
            score += triple_score(face);
        }
    }

    score += hand.count(1) as u32 * SCORE_ONE;
    score += hand.count(5) as u32 * SCORE_FIVE;

    Ok(score)
}

/// True iff the hand is worth any points. Invalid hands never score.
pub fn can_score(dice: &[u8]) -> bool {
    matches!(calculate_score(dice), Ok(s) if s > 0)
}
