use serde::{Deserialize, Serialize};

use super::params::GlobalParams;

/// A faction's tuning triple, nominally each in `[1, 10]`.
///
/// Serialized as the 3-element array `[aggression, defense, mobility]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct FactionSettings {
    pub aggression: f64,
    pub defense: f64,
    pub mobility: f64,
}

impl Default for FactionSettings {
    fn default() -> Self {
        Self::UNIT
    }
}

impl FactionSettings {
    /// Settings of a faction with no ledger history.
    pub const UNIT: Self = Self::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(aggression: f64, defense: f64, mobility: f64) -> Self {
        Self {
            aggression,
            defense,
            mobility,
        }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.aggression, self.defense, self.mobility]
    }

    /// Scales the triple by the global aggression/defense/mobility coefficients.
    #[must_use]
    pub fn effective(&self, params: &GlobalParams) -> EffectiveStrength {
        EffectiveStrength {
            aggression: self.aggression * params.aggression_scale(),
            defense: self.defense * params.defense_scale(),
            mobility: self.mobility * params.mobility_scale(),
        }
    }
}

impl From<[f64; 3]> for FactionSettings {
    fn from([aggression, defense, mobility]: [f64; 3]) -> Self {
        Self::new(aggression, defense, mobility)
    }
}

impl From<FactionSettings> for [f64; 3] {
    fn from(settings: FactionSettings) -> Self {
        settings.to_array()
    }
}

/// Faction settings after scaling by the global parameter vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStrength {
    pub aggression: f64,
    pub defense: f64,
    pub mobility: f64,
}
