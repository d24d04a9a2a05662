use std::ops::RangeInclusive;

use rand::{Rng, RngCore};

/// Range of an attacker's roll.
pub const ATTACK_ROLL: RangeInclusive<u32> = 1..=100;

/// Range of a defender's roll.
///
/// Wider than [`ATTACK_ROLL`], which skews contests toward the defender.
pub const DEFENSE_ROLL: RangeInclusive<u32> = 1..=900;

/// Source of the random draws used when resolving combat.
///
/// The round engine takes this as a parameter so that replays and tests can fix the
/// outcome of every contest.
pub trait CombatDice {
    /// Uniform integer in [`ATTACK_ROLL`].
    fn attack_roll(&mut self) -> u32;

    /// Uniform integer in [`DEFENSE_ROLL`].
    fn defense_roll(&mut self) -> u32;
}

impl<D> CombatDice for &mut D
where
    D: CombatDice + ?Sized,
{
    fn attack_roll(&mut self) -> u32 {
        (**self).attack_roll()
    }

    fn defense_roll(&mut self) -> u32 {
        (**self).defense_roll()
    }
}

/// [`CombatDice`] backed by a random number generator.
///
/// # Example
///
/// ```
/// use cellquest_engine::{CombatDice, RngDice, ATTACK_ROLL};
/// use rand::SeedableRng as _;
///
/// let mut dice = RngDice(rand::rngs::StdRng::seed_from_u64(7));
/// assert!(ATTACK_ROLL.contains(&dice.attack_roll()));
/// ```
#[derive(Debug, Clone)]
pub struct RngDice<R>(pub R);

impl<R> CombatDice for RngDice<R>
where
    R: RngCore,
{
    fn attack_roll(&mut self) -> u32 {
        self.0.random_range(ATTACK_ROLL)
    }

    fn defense_roll(&mut self) -> u32 {
        self.0.random_range(DEFENSE_ROLL)
    }
}

/// [`CombatDice`] that always returns the same pair of rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDice {
    pub attack: u32,
    pub defense: u32,
}

impl FixedDice {
    /// Every attack lands its best roll against the defender's worst.
    pub const ATTACKER_WINS: Self = Self {
        attack: *ATTACK_ROLL.end(),
        defense: *DEFENSE_ROLL.start(),
    };

    /// Every attack lands its worst roll against the defender's best.
    pub const DEFENDER_WINS: Self = Self {
        attack: *ATTACK_ROLL.start(),
        defense: *DEFENSE_ROLL.end(),
    };
}

impl CombatDice for FixedDice {
    fn attack_roll(&mut self) -> u32 {
        self.attack
    }

    fn defense_roll(&mut self) -> u32 {
        self.defense
    }
}
