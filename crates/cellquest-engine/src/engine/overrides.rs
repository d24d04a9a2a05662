use serde::{Deserialize, Deserializer, de::IgnoredAny};

use crate::core::{Faction, FactionMap};

use super::{params::GlobalParams, settings::FactionSettings};

/// Values a caller injects before a round runs.
///
/// Deserializes from any JSON object: `blueSettings` .. `purpleSettings` and
/// `waiSettings` are picked up when present and well-formed, everything else is
/// ignored. A full snapshot document is therefore a valid override body. Malformed
/// entries are dropped so the stored values stay in effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundOverrides {
    pub settings: FactionMap<Option<FactionSettings>>,
    pub params: Option<GlobalParams>,
}

impl RoundOverrides {
    /// No overrides.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(mut self, faction: Faction, settings: FactionSettings) -> Self {
        self.settings[faction] = Some(settings);
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: GlobalParams) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_none() && self.settings.values().all(Option::is_none)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Malformed(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_valid(self, key: &str) -> Option<T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Malformed(_) => {
                tracing::debug!(key, "ignoring malformed override");
                None
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverridesRepr {
    blue_settings: Option<Lenient<FactionSettings>>,
    red_settings: Option<Lenient<FactionSettings>>,
    yellow_settings: Option<Lenient<FactionSettings>>,
    green_settings: Option<Lenient<FactionSettings>>,
    purple_settings: Option<Lenient<FactionSettings>>,
    wai_settings: Option<Lenient<GlobalParams>>,
}

impl<'de> Deserialize<'de> for RoundOverrides {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let OverridesRepr {
            blue_settings,
            red_settings,
            yellow_settings,
            green_settings,
            purple_settings,
            wai_settings,
        } = OverridesRepr::deserialize(deserializer)?;
        let mut entries = [
            blue_settings,
            red_settings,
            yellow_settings,
            green_settings,
            purple_settings,
        ]
        .into_iter();
        Ok(Self {
            settings: FactionMap::from_fn(|faction| {
                entries
                    .next()
                    .flatten()
                    .and_then(|v| v.into_valid(&format!("{}Settings", faction.key())))
            }),
            params: wai_settings.and_then(|v| v.into_valid("waiSettings")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_recognized_keys() {
        let overrides: RoundOverrides = serde_json::from_str(
            r#"{"redSettings": [1, 10, 1], "waiSettings": [1,2,3,4,5,6,7,8,9,10,11,12,13,14]}"#,
        )
        .unwrap();
        assert_eq!(
            overrides.settings[Faction::Red],
            Some(FactionSettings::new(1.0, 10.0, 1.0))
        );
        assert_eq!(overrides.settings[Faction::Blue], None);
        assert_eq!(overrides.params.unwrap().get(13), 14.0);
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let overrides: RoundOverrides = serde_json::from_str(
            r#"{"blueSettings": [1, 2], "greenSettings": "fast", "purpleSettings": null,
                "waiSettings": [1, 5486, 3474], "yellowSettings": [3, 3, 3]}"#,
        )
        .unwrap();
        assert_eq!(overrides.settings[Faction::Blue], None);
        assert_eq!(overrides.settings[Faction::Green], None);
        assert_eq!(overrides.settings[Faction::Purple], None);
        assert_eq!(overrides.params, None);
        assert_eq!(
            overrides.settings[Faction::Yellow],
            Some(FactionSettings::new(3.0, 3.0, 3.0))
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let overrides: RoundOverrides =
            serde_json::from_str(r#"{"coordString": "x", "Finished": true}"#).unwrap();
        assert!(overrides.is_empty());
    }
}
