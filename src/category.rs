//! Disaster categories.
//!
//! A closed set of disaster tags plus the `GeneralDisaster` catch-all. The
//! snake_case key is what the knowledge file and the learned cache store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Disaster classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Earthquake,
    Flood,
    Fire,
    Hurricane,
    Tornado,
    WinterStorm,
    Tsunami,
    Wildfire,
    HeatWave,
    /// Catch-all when no keyword matches.
    GeneralDisaster,
}

impl Category {
    /// Every category, generic last.
    pub const ALL: [Category; 10] = [
        Category::Earthquake,
        Category::Flood,
        Category::Fire,
        Category::Hurricane,
        Category::Tornado,
        Category::WinterStorm,
        Category::Tsunami,
        Category::Wildfire,
        Category::HeatWave,
        Category::GeneralDisaster,
    ];

    /// Storage key, e.g. `"winter_storm"`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Earthquake => "earthquake",
            Self::Flood => "flood",
            Self::Fire => "fire",
            Self::Hurricane => "hurricane",
            Self::Tornado => "tornado",
            Self::WinterStorm => "winter_storm",
            Self::Tsunami => "tsunami",
            Self::Wildfire => "wildfire",
            Self::HeatWave => "heat_wave",
            Self::GeneralDisaster => "general_disaster",
        }
    }

    /// Parse a storage key. Returns `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// Parse a storage key, mapping anything unknown to `GeneralDisaster`.
    pub fn from_key_lenient(key: &str) -> Self {
        Self::from_key(key).unwrap_or(Self::GeneralDisaster)
    }

    /// Human-readable title, e.g. `"Winter Storm"`.
    pub fn display_name(&self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Self::GeneralDisaster)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::from_key_lenient(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.key().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
    }

    #[test]
    fn test_from_key_unknown() {
        assert_eq!(Category::from_key("meteor"), None);
        assert_eq!(
            Category::from_key_lenient("general"),
            Category::GeneralDisaster
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Category::WinterStorm.display_name(), "Winter Storm");
        assert_eq!(Category::Flood.display_name(), "Flood");
        assert_eq!(Category::GeneralDisaster.display_name(), "General Disaster");
    }

    #[test]
    fn test_serde_uses_storage_key() {
        let json = serde_json::to_string(&Category::HeatWave).unwrap();
        assert_eq!(json, "\"heat_wave\"");
        let parsed: Category = serde_json::from_str("\"tsunami\"").unwrap();
        assert_eq!(parsed, Category::Tsunami);
        let unknown: Category = serde_json::from_str("\"volcano\"").unwrap();
        assert_eq!(unknown, Category::GeneralDisaster);
    }
}
