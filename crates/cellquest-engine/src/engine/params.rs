//! The global parameter vector.
//!
//! Every coefficient has a fixed meaning by position:
//!
//! | index | meaning |
//! |---|---|
//! | 0 | episode length, written when an episode ends |
//! | 1 | growth rate (`k = p[1] * 0.01`) |
//! | 2 | inflection point (carried, unused) |
//! | 3 | population erosion divisor for terrain drift |
//! | 4 | attack-ratio scaling (carried, unused) |
//! | 5 | conquest loss (`max(p[5] * 0.001, 0.99)`) |
//! | 6 | battle attrition percent |
//! | 7 | base migration rate (`max(1, p[7] * 0.001)`) |
//! | 8 | border migration rate (`max(1, p[8] * 0.001)`) |
//! | 9 | terrain sensitivity divisor for growth |
//! | 10 | terrain recovery per round |
//! | 11..=13 | aggression / defense / mobility scales |
//!
//! Vectors may be longer than [`GlobalParams::MIN_LEN`]; extra coefficients are carried
//! along and take part in mutation.

use serde::{Deserialize, Serialize};

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("global parameter vector needs at least {} coefficients, got {len}", GlobalParams::MIN_LEN)]
pub struct ParamsError {
    pub len: usize,
}

/// Ordered coefficient vector controlling growth, terrain, combat and migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct GlobalParams(Vec<f64>);

impl GlobalParams {
    pub const MIN_LEN: usize = 14;

    pub const EPISODE_LENGTH: usize = 0;
    pub const GROWTH_RATE: usize = 1;
    pub const INFLECTION: usize = 2;
    pub const EROSION: usize = 3;
    pub const ATTACK_RATIO: usize = 4;
    pub const CONQUEST_LOSS: usize = 5;
    pub const ATTRITION: usize = 6;
    pub const BASE_MIGRATION: usize = 7;
    pub const BORDER_MIGRATION: usize = 8;
    pub const TERRAIN_SENSITIVITY: usize = 9;
    pub const TERRAIN_RECOVERY: usize = 10;
    pub const AGGRESSION_SCALE: usize = 11;
    pub const DEFENSE_SCALE: usize = 12;
    pub const MOBILITY_SCALE: usize = 13;

    /// Vector used when no parameter ledger exists.
    ///
    /// Indices 8 to 13 set border migration equal to base migration, divide terrain by
    /// [`MAX_TERRAIN`](crate::core::MAX_TERRAIN), recover one terrain point per round and
    /// leave faction settings unscaled.
    pub const FALLBACK: [f64; Self::MIN_LEN] = [
        1.0, 5486.0, 3474.0, 120.0, 0.1, 3.0, 17.0, 20.0, 20.0, 2550.0, 1.0, 1.0, 1.0, 1.0,
    ];

    pub fn new(values: Vec<f64>) -> Result<Self, ParamsError> {
        if values.len() < Self::MIN_LEN {
            return Err(ParamsError { len: values.len() });
        }
        Ok(Self(values))
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self(Self::FALLBACK.to_vec())
    }

    /// Returns a copy with the coefficient at `index` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn with_coefficient(mut self, index: usize, value: f64) -> Self {
        self.0[index] = value;
        self
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Mutable view of the coefficients. The length cannot change through it.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    #[must_use]
    pub fn episode_length(&self) -> f64 {
        self.0[Self::EPISODE_LENGTH]
    }

    pub fn set_episode_length(&mut self, rounds: u64) {
        #[expect(clippy::cast_precision_loss)]
        let rounds = rounds as f64;
        self.0[Self::EPISODE_LENGTH] = rounds;
    }

    /// Logistic growth rate `k`.
    #[must_use]
    pub fn growth_rate(&self) -> f64 {
        self.0[Self::GROWTH_RATE] * 0.01
    }

    #[must_use]
    pub fn erosion_divisor(&self) -> f64 {
        self.0[Self::EROSION]
    }

    /// Fraction of its population an attacker loses on conquest.
    #[must_use]
    pub fn conquest_loss(&self) -> f64 {
        f64::max(self.0[Self::CONQUEST_LOSS] * 0.001, 0.99)
    }

    /// Fraction of population lost to battle attrition.
    #[must_use]
    pub fn attrition(&self) -> f64 {
        self.0[Self::ATTRITION] * 0.01
    }

    #[must_use]
    pub fn base_migration_rate(&self) -> f64 {
        f64::max(1.0, self.0[Self::BASE_MIGRATION] * 0.001)
    }

    #[must_use]
    pub fn border_migration_rate(&self) -> f64 {
        f64::max(1.0, self.0[Self::BORDER_MIGRATION] * 0.001)
    }

    #[must_use]
    pub fn terrain_sensitivity(&self) -> f64 {
        self.0[Self::TERRAIN_SENSITIVITY]
    }

    #[must_use]
    pub fn terrain_recovery(&self) -> f64 {
        self.0[Self::TERRAIN_RECOVERY]
    }

    #[must_use]
    pub fn aggression_scale(&self) -> f64 {
        self.0[Self::AGGRESSION_SCALE]
    }

    #[must_use]
    pub fn defense_scale(&self) -> f64 {
        self.0[Self::DEFENSE_SCALE]
    }

    #[must_use]
    pub fn mobility_scale(&self) -> f64 {
        self.0[Self::MOBILITY_SCALE]
    }
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self::fallback()
    }
}

impl TryFrom<Vec<f64>> for GlobalParams {
    type Error = ParamsError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<GlobalParams> for Vec<f64> {
    fn from(params: GlobalParams) -> Self {
        params.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_vectors() {
        let err = GlobalParams::new(vec![1.0; 8]).unwrap_err();
        assert_eq!(err.len, 8);
        assert!(serde_json::from_str::<GlobalParams>("[1,5486,3474,120,0.1,3,17,20]").is_err());
    }

    #[test]
    fn test_accepts_longer_vectors() {
        let params = GlobalParams::new(vec![2.0; 16]).unwrap();
        assert_eq!(params.len(), 16);
    }

    #[test]
    fn test_rate_floors() {
        let params = GlobalParams::fallback();
        // 3 * 0.001 is below the 0.99 floor
        assert_eq!(params.conquest_loss(), 0.99);
        assert!((params.attrition() - 0.17).abs() < 1e-12);
        assert_eq!(params.base_migration_rate(), 1.0);
        assert_eq!(params.border_migration_rate(), 1.0);

        let params = GlobalParams::fallback().with_coefficient(GlobalParams::BORDER_MIGRATION, 2500.0);
        assert_eq!(params.border_migration_rate(), 2.5);
    }

    #[test]
    fn test_episode_length_slot() {
        let mut params = GlobalParams::fallback();
        params.set_episode_length(812);
        assert_eq!(params.episode_length(), 812.0);
        assert_eq!(params.get(1), 5486.0);
    }
}
