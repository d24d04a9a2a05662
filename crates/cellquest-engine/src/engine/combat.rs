//! Combat sub-step: conquest resolution between an owned cell and one neighbor.

use crate::core::{Cell, Faction, MAX_TERRAIN};

use super::{dice::CombatDice, params::GlobalParams, settings::EffectiveStrength};

/// Ratio of attacker to defender population an attacker must exceed to engage.
pub const ATTACK_RATIO_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CombatOutcome {
    /// The defender's cell changes hands.
    Conquest,
    /// The defender holds.
    Repelled,
}

/// Working populations of both sides after a contest.
///
/// Values are not yet rounded to cell populations; the round engine clamps them when
/// writing them back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clash {
    pub outcome: CombatOutcome,
    pub attacker: f64,
    pub defender: f64,
}

/// Whether a cell owned by `owner` with `population` attacks `defender`.
#[must_use]
pub fn is_eligible(owner: Option<Faction>, population: u32, defender: &Cell) -> bool {
    defender.owner != owner
        && defender.population > 0
        && f64::from(population) / f64::from(defender.population.max(1)) > ATTACK_RATIO_THRESHOLD
}

/// Attacker's score for a given roll.
#[must_use]
pub fn attack_score(population: u32, terrain: u32, aggression: f64, roll: u32) -> f64 {
    f64::from(population) * f64::from(roll) * (1.0 + terrain_edge(terrain) + aggression / 8.0)
}

/// Defender's score for a given roll. `defense` is the defending faction's raw setting.
#[must_use]
pub fn defense_score(population: u32, terrain: u32, defense: f64, roll: u32) -> f64 {
    f64::from(population) * f64::from(roll) * (1.0 + terrain_edge(terrain) + defense)
}

fn terrain_edge(terrain: u32) -> f64 {
    let max = f64::from(MAX_TERRAIN);
    (max - f64::from(terrain)) / max
}

/// Rolls one contest between an attacking cell and `defender`.
///
/// `defense` is the defending faction's unscaled defense setting (zero for unowned
/// cells). On conquest the attacker keeps only `1 - conquest_loss` of its population
/// and a quarter of what it lost moves into the conquered cell, which also suffers
/// attrition. On a repelled attack the attacker suffers full attrition and the defender
/// a third of it.
pub fn resolve<D>(
    population: u32,
    terrain: u32,
    strength: &EffectiveStrength,
    defender: &Cell,
    defense: f64,
    params: &GlobalParams,
    dice: &mut D,
) -> Clash
where
    D: CombatDice + ?Sized,
{
    let attacker_score = attack_score(population, terrain, strength.aggression, dice.attack_roll());
    let defender_score = defense_score(
        defender.population,
        defender.terrain,
        defense,
        dice.defense_roll(),
    );

    let pop = f64::from(population);
    let n_pop = f64::from(defender.population);
    let attrition = params.attrition();
    if attacker_score > defender_score {
        let loss = params.conquest_loss();
        Clash {
            outcome: CombatOutcome::Conquest,
            attacker: f64::max(1.0, (pop - pop * loss).ceil()),
            defender: f64::max(1.0, (n_pop - n_pop * attrition).ceil()) + pop * loss / 4.0,
        }
    } else {
        Clash {
            outcome: CombatOutcome::Repelled,
            attacker: f64::max(1.0, (pop - pop * attrition).ceil()),
            defender: f64::max(1.0, (n_pop - n_pop * attrition / 3.0).ceil()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{FactionSettings, FixedDice, SEED_TERRAIN};

    use super::*;

    fn defender(owner: Option<Faction>, population: u32) -> Cell {
        Cell {
            owner,
            population,
            ..Cell::SEED
        }
    }

    #[test]
    fn test_eligibility() {
        let blue = Some(Faction::Blue);
        assert!(is_eligible(blue, 5, &defender(None, 1)));
        assert!(is_eligible(blue, 5, &defender(Some(Faction::Red), 5)));
        // exactly 0.8 is not enough
        assert!(!is_eligible(blue, 4, &defender(Some(Faction::Red), 5)));
        assert!(!is_eligible(blue, 500, &defender(blue, 5)));
        assert!(!is_eligible(blue, 500, &defender(Some(Faction::Red), 0)));
    }

    #[test]
    fn test_scores() {
        // full terrain edge at terrain 0 doubles the base
        assert_eq!(attack_score(10, 0, 8.0, 3), 10.0 * 3.0 * 3.0);
        assert_eq!(defense_score(10, MAX_TERRAIN, 1.0, 7), 10.0 * 7.0 * 2.0);
    }

    #[test]
    fn test_conquest() {
        let params = GlobalParams::fallback();
        let strength = FactionSettings::new(10.0, 1.0, 1.0).effective(&params);
        let target = defender(Some(Faction::Red), 5);
        let clash = resolve(
            500,
            SEED_TERRAIN,
            &strength,
            &target,
            1.0,
            &params,
            &mut FixedDice::ATTACKER_WINS,
        );
        assert!(clash.outcome.is_conquest());
        // loss fraction 0.99
        assert_eq!(clash.attacker, 5.0);
        assert!(clash.attacker < 500.0);
        // ceil(5 - 0.85) + 500 * 0.99 / 4
        assert!((clash.defender - (5.0 + 123.75)).abs() < 1e-9);
    }

    #[test]
    fn test_repelled() {
        let params = GlobalParams::fallback();
        let strength = FactionSettings::UNIT.effective(&params);
        let target = defender(Some(Faction::Green), 100);
        let clash = resolve(
            100,
            SEED_TERRAIN,
            &strength,
            &target,
            1.0,
            &params,
            &mut FixedDice::DEFENDER_WINS,
        );
        assert!(clash.outcome.is_repelled());
        // ceil(100 - 17) and ceil(100 - 17 / 3)
        assert_eq!(clash.attacker, 83.0);
        assert_eq!(clash.defender, 95.0);
    }

    #[test]
    fn test_equal_scores_favor_defender() {
        let params = GlobalParams::fallback();
        let strength = FactionSettings::new(0.0, 0.0, 0.0).effective(&params);
        let target = defender(None, 10);
        let mut dice = FixedDice {
            attack: 10,
            defense: 10,
        };
        let clash = resolve(10, SEED_TERRAIN, &strength, &target, 0.0, &params, &mut dice);
        assert!(clash.outcome.is_repelled());
    }
}
