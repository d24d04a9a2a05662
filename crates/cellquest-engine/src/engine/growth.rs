//! Growth sub-step: logistic population growth and terrain drift of an owned cell.

use crate::core::{CARRYING_CAPACITY, SEED_TERRAIN, clamp_population, clamp_terrain};

use super::{params::GlobalParams, settings::EffectiveStrength};

/// Population at which the density decay starts to apply.
const DENSITY_DECAY_THRESHOLD: f64 = 100.0;

/// Advances a cell's population by one round of logistic growth.
///
/// The logistic increment is damped by the owner's effective aggression and boosted by
/// terrain. Populations of 100 or more are then cut by `ceil(pop² / 1000)` on top of
/// the logistic term. The result is clamped into `[1, 1000]`.
#[must_use]
pub fn grow(
    population: u32,
    terrain: u32,
    strength: &EffectiveStrength,
    params: &GlobalParams,
) -> u32 {
    let capacity = f64::from(CARRYING_CAPACITY);
    let pop = f64::from(population);
    let growth = pop
        * params.growth_rate()
        * (1.0 - pop / capacity)
        * (1.0 + f64::from(terrain) / params.terrain_sensitivity())
        * (1.0 - 0.7 * (strength.aggression / 10.0));

    let mut next = f64::max(1.0, pop + growth).ceil();
    if next >= DENSITY_DECAY_THRESHOLD {
        next -= (next * next / capacity).ceil();
    }
    clamp_population(next)
}

/// Advances a cell's terrain by one round.
///
/// Terrain recovers by a fixed amount, is eroded by population and defense, and is
/// raised by the mobility term. A zero terrain resets to the seed value instead.
#[must_use]
pub fn drift_terrain(
    terrain: u32,
    population: u32,
    strength: &EffectiveStrength,
    params: &GlobalParams,
) -> u32 {
    if terrain == 0 {
        return SEED_TERRAIN;
    }
    let drifted = f64::from(terrain) + params.terrain_recovery()
        - (f64::from(population) / params.erosion_divisor()).ceil()
        - (strength.defense / 50.0).ceil()
        + mobility_term(strength.mobility).ceil();
    clamp_terrain(drifted)
}

/// Bitwise XOR of the truncated mobility with the truncated quotient `2 / 10`.
///
/// The quotient truncates to zero, so the term is the truncated mobility itself.
fn mobility_term(mobility: f64) -> f64 {
    const QUOTIENT: i64 = 2 / 10;
    #[expect(clippy::cast_possible_truncation)]
    let truncated = mobility as i64;
    #[expect(clippy::cast_precision_loss)]
    let term = (truncated ^ QUOTIENT) as f64;
    term
}

#[cfg(test)]
mod tests {
    use crate::FactionSettings;

    use super::*;

    fn strength(aggression: f64, defense: f64, mobility: f64) -> EffectiveStrength {
        FactionSettings::new(aggression, defense, mobility).effective(&GlobalParams::fallback())
    }

    #[test]
    fn test_logistic_increment() {
        let params = GlobalParams::fallback()
            .with_coefficient(GlobalParams::GROWTH_RATE, 10.0)
            .with_coefficient(GlobalParams::TERRAIN_SENSITIVITY, 2400.0);
        // 10 * 0.1 * 0.99 * 2.0 * 1.0 = 1.98
        assert_eq!(grow(10, 2400, &strength(0.0, 1.0, 1.0), &params), 12);
        // aggression 10 damps the increment to 30%: 1.98 * 0.3 = 0.594
        assert_eq!(grow(10, 2400, &strength(10.0, 1.0, 1.0), &params), 11);
    }

    #[test]
    fn test_density_decay_above_threshold() {
        let params = GlobalParams::fallback().with_coefficient(GlobalParams::GROWTH_RATE, 0.0);
        let s = strength(1.0, 1.0, 1.0);
        assert_eq!(grow(99, 2400, &s, &params), 99);
        // 200 - ceil(200 * 200 / 1000)
        assert_eq!(grow(200, 2400, &s, &params), 160);
        // 1000 decays to zero and is clamped back to one
        assert_eq!(grow(1000, 2400, &s, &params), 1);
    }

    #[test]
    fn test_growth_never_leaves_bounds() {
        let params = GlobalParams::fallback();
        for aggression in [1.0, 5.0, 10.0, 30.0] {
            let s = strength(aggression, 1.0, 1.0);
            for pop in [1, 2, 10, 50, 99, 100, 500, 999, 1000] {
                for terrain in [1, 1200, 2400, 2550] {
                    let next = grow(pop, terrain, &s, &params);
                    assert!((1..=CARRYING_CAPACITY).contains(&next), "{pop} -> {next}");
                }
            }
        }
    }

    #[test]
    fn test_terrain_drift() {
        let params = GlobalParams::fallback();
        // + 1 recovery - ceil(120 / 120) - ceil(1 / 50) + 1 mobility
        assert_eq!(drift_terrain(2400, 120, &strength(1.0, 1.0, 1.0), &params), 2400);
        assert_eq!(drift_terrain(2400, 120, &strength(1.0, 1.0, 3.7), &params), 2402);
        assert_eq!(drift_terrain(2400, 121, &strength(1.0, 1.0, 1.0), &params), 2399);
    }

    #[test]
    fn test_terrain_drift_clamps_and_resets() {
        let params = GlobalParams::fallback();
        let s = strength(1.0, 1.0, 9.0);
        assert_eq!(drift_terrain(0, 500, &s, &params), SEED_TERRAIN);
        assert_eq!(drift_terrain(2550, 1, &s, &params), 2550);

        let eroding = params.with_coefficient(GlobalParams::EROSION, 1.0);
        assert_eq!(drift_terrain(5, 1000, &s, &eroding), 1);
    }

    #[test]
    fn test_mobility_term_is_truncation() {
        assert_eq!(mobility_term(1.0), 1.0);
        assert_eq!(mobility_term(3.9), 3.0);
        assert_eq!(mobility_term(10.0), 10.0);
    }
}
