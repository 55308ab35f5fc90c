use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized identifier of a geographic unit (state or sub-state region).
///
/// The key is the display name with all whitespace removed, so
/// `"New York North"` and `"NewYorkNorth"` address the same unit. It is also
/// used verbatim as the DOM id of the unit's map path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UnitKey(String);

impl UnitKey {
    pub fn normalize(name: &str) -> Self {
        Self(name.chars().filter(|c| !c.is_whitespace()).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the companion contact card element.
    pub fn card_id(&self) -> String {
        format!("card-{}", self.0)
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys are normalized on the way in, so config files may list display names.
impl<'de> Deserialize<'de> for UnitKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|name| Self::normalize(&name))
    }
}

impl From<&str> for UnitKey {
    fn from(name: &str) -> Self {
        Self::normalize(name)
    }
}

/// One unit as supplied by the feature provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitFeature {
    pub name: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_rep: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_rep_contact: Option<String>,
    /// Pre-projected SVG path data. Opaque to everything but the renderer.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl UnitFeature {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            density: None,
            sales_rep: None,
            sales_rep_contact: None,
            path: None,
        }
    }

    pub fn key(&self) -> UnitKey {
        UnitKey::normalize(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredUnit {
    pub key: UnitKey,
    pub name: String,
}

/// Ordered set of known units, in provider order.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<RegisteredUnit>,
    by_key: HashMap<UnitKey, usize>,
    duplicates: Vec<UnitKey>,
}

impl UnitRegistry {
    /// Register every feature. A repeated key keeps the first feature and is
    /// reported through [`UnitRegistry::duplicates`].
    pub fn from_features(features: &[UnitFeature]) -> Self {
        let mut registry = Self::default();
        for feature in features {
            let key = feature.key();
            if registry.by_key.contains_key(&key) {
                registry.duplicates.push(key);
                continue;
            }
            registry.by_key.insert(key.clone(), registry.units.len());
            registry.units.push(RegisteredUnit {
                key,
                name: feature.name.clone(),
            });
        }
        registry
    }

    pub fn get(&self, key: &UnitKey) -> Option<&RegisteredUnit> {
        self.by_key.get(key).map(|&idx| &self.units[idx])
    }

    pub fn contains(&self, key: &UnitKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Display name for `key`, falling back to the key itself for unknown units.
    pub fn display_name<'a>(&'a self, key: &'a UnitKey) -> &'a str {
        self.get(key).map_or(key.as_str(), |unit| unit.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn duplicates(&self) -> &[UnitKey] {
        &self.duplicates
    }
}
