//! Initiative rolls.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Sides on the initiative die.
pub const INITIATIVE_DIE: i32 = 20;

/// Largest modifier magnitude. Keeps `roll + modifier` inside `i32` for
/// every face of the die.
pub const MAX_MODIFIER: i32 = i32::MAX - INITIATIVE_DIE;

/// Bring a modifier into `-MAX_MODIFIER..=MAX_MODIFIER`.
pub fn clamp_modifier(modifier: i32) -> i32 {
    modifier.clamp(-MAX_MODIFIER, MAX_MODIFIER)
}

/// The outcome of one initiative roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    /// Raw d20 value (1 to 20).
    pub roll: i32,
    /// `roll + modifier`.
    pub total: i32,
}

impl std::fmt::Display for InitiativeRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let modifier = self.total - self.roll;
        write!(f, "d20 [{}] {modifier:+} = {}", self.roll, self.total)
    }
}

/// Roll a d20 and add the modifier, clamped with [`clamp_modifier`].
pub fn roll_initiative(rng: &mut StdRng, modifier: i32) -> InitiativeRoll {
    let roll = rng.random_range(1..=INITIATIVE_DIE);
    InitiativeRoll {
        roll,
        total: roll + clamp_modifier(modifier),
    }
}
