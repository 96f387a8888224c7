//! Dice for combat and escape rolls.
//!
//! Rules never touch a global RNG: every roll goes through an [`RngOracle`]
//! owned by the match, so tests can script outcomes and a seeded match
//! replays identically.

use crate::player::Die;

pub trait RngOracle: Send {
    fn next_u32(&mut self) -> u32;

    /// Uniform in `1..=die.sides()`.
    fn roll_die(&mut self, die: Die) -> u32 {
        (self.next_u32() % die.sides()) + 1
    }

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&mut self) -> u32 {
        (self.next_u32() % 100) + 1
    }

    /// True with probability `percent / 100`. `0` never succeeds, `100` always does.
    fn chance(&mut self, percent: u32) -> bool {
        self.roll_d100() <= percent
    }
}

/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}

/// Replays fixed die faces, then repeats the last one.
///
/// Faces are stored as `face - 1`, so a face is reproduced exactly by any die
/// with at least that many sides (including the d100 used for escapes).
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    faces: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().map(|face| face.saturating_sub(1)).collect(),
            cursor: 0,
        }
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let Some(last) = self.faces.len().checked_sub(1) else {
            return 0;
        };
        let value = self.faces[self.cursor.min(last)];
        self.cursor += 1;
        value
    }
}
