use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contact::{ContactRecord, MetadataStore, TooltipContent};
use crate::style::Palette;
use crate::territory::{DefinitionIssue, TerritoryDefinition, TerritoryIndex};
use crate::unit::{UnitFeature, UnitKey, UnitRegistry};

/// Territory/contact configuration as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub territories: TerritoryDefinition,
    /// Contacts keyed by display name; merged over feature properties.
    #[serde(default)]
    pub contacts: BTreeMap<String, ContactRecord>,
    #[serde(default)]
    pub palette: Palette,
}

/// Everything the client needs to draw and drive the map, in one response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPayload {
    #[serde(flatten)]
    pub config: MapConfig,
    pub units: Vec<UnitFeature>,
}

/// Immutable, fully-derived map data. Built once; shared read-only.
#[derive(Debug, Clone, Default)]
pub struct MapModel {
    pub registry: UnitRegistry,
    pub definition: TerritoryDefinition,
    pub index: TerritoryIndex,
    pub contacts: MetadataStore,
    pub palette: Palette,
}

impl MapModel {
    pub fn build(units: &[UnitFeature], config: &MapConfig) -> Self {
        let registry = UnitRegistry::from_features(units);
        let index = TerritoryIndex::build(&config.territories);
        let mut contacts = MetadataStore::from_features(units);
        contacts.merge(&config.contacts);
        Self {
            registry,
            definition: config.territories.clone(),
            index,
            contacts,
            palette: config.palette.clone(),
        }
    }

    pub fn from_payload(payload: &MapPayload) -> Self {
        Self::build(&payload.units, &payload.config)
    }

    pub fn issues(&self) -> &[DefinitionIssue] {
        self.index.issues()
    }

    pub fn tooltip_for(&self, unit: &UnitKey) -> TooltipContent {
        TooltipContent::resolve(
            self.registry.display_name(unit),
            self.contacts.lookup(unit),
        )
    }
}
