//! Random perturbation applied when a new episode is set up.
//!
//! Both rules pick a single coefficient and multiply it by a factor drawn uniformly
//! from `{0.50, 0.51, ..., 2.10}`, then round the result up. Everything else is left
//! untouched, so a ledger head is explored one coordinate at a time.

use std::ops::RangeInclusive;

use cellquest_engine::{FactionSettings, GlobalParams};
use rand::Rng;

/// Mutation factor range, in hundredths.
pub const FACTOR_PERCENT: RangeInclusive<u32> = 50..=210;

/// Bounds of a mutated faction setting.
pub const SETTING_RANGE: RangeInclusive<f64> = 1.0..=10.0;

fn random_factor<R>(rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    f64::from(rng.random_range(FACTOR_PERCENT)) / 100.0
}

/// Scales one coefficient of `params`, never index 0 (episode length).
///
/// Returns the index that changed.
pub fn mutate_params<R>(params: &mut GlobalParams, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let index = rng.random_range(1..params.len());
    let factor = random_factor(rng);
    let value = &mut params.as_mut_slice()[index];
    *value = (*value * factor).ceil();
    index
}

/// Scales one of aggression, defense or mobility, keeping it within [`SETTING_RANGE`].
pub fn mutate_settings<R>(settings: &mut FactionSettings, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let factor = random_factor(rng);
    let value = match rng.random_range(0..3) {
        0 => &mut settings.aggression,
        1 => &mut settings.defense,
        _ => &mut settings.mobility,
    };
    *value = (*value * factor)
        .clamp(*SETTING_RANGE.start(), *SETTING_RANGE.end())
        .ceil();
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_params_mutation_touches_one_coefficient() {
        let mut rng = Pcg32::seed_from_u64(5);
        let original = GlobalParams::fallback();
        for _ in 0..200 {
            let mut params = original.clone();
            let index = mutate_params(&mut params, &mut rng);
            assert_ne!(index, GlobalParams::EPISODE_LENGTH);
            let pairs = original.as_slice().iter().zip(params.as_slice());
            for (i, (before, after)) in pairs.enumerate() {
                if i == index {
                    assert!(*after >= (before * 0.5).ceil());
                    assert!(*after <= (before * 2.1).ceil());
                    assert_eq!(*after, after.ceil());
                } else {
                    assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn test_params_mutation_reaches_every_index() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut seen = [false; GlobalParams::MIN_LEN];
        for _ in 0..1000 {
            let mut params = GlobalParams::fallback();
            seen[mutate_params(&mut params, &mut rng)] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|s| *s));
    }

    #[test]
    fn test_settings_mutation_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut settings = FactionSettings::new(1.0, 10.0, 4.0);
        for _ in 0..500 {
            let before = settings;
            mutate_settings(&mut settings, &mut rng);
            for value in settings.to_array() {
                assert!(SETTING_RANGE.contains(&value));
                assert_eq!(value, value.ceil());
            }
            let changed = before
                .to_array()
                .iter()
                .zip(settings.to_array())
                .filter(|(b, a)| **b != *a)
                .count();
            assert!(changed <= 1);
        }
    }
}
