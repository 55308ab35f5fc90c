use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::unit::{UnitKey, UnitRegistry};

pub type TerritoryId = String;

/// One territory block as written in the map config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryEntry {
    pub id: TerritoryId,
    #[serde(default)]
    pub members: Vec<UnitKey>,
}

/// Ordered territory definitions. Order is significant: it decides which
/// territory wins when a unit is listed more than once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryDefinition {
    entries: Vec<TerritoryEntry>,
}

impl TerritoryDefinition {
    /// Convenience constructor from `(id, display names)` pairs.
    pub fn from_pairs<'a, I, M>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, M)>,
        M: IntoIterator<Item = &'a str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(id, members)| TerritoryEntry {
                id: id.to_owned(),
                members: members.into_iter().map(UnitKey::normalize).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TerritoryEntry] {
        &self.entries
    }

    /// Member list of the first block named `id`, or an empty slice.
    pub fn members_of(&self, id: &str) -> &[UnitKey] {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.members.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Non-fatal problems found while inverting a [`TerritoryDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionIssue {
    EmptyTerritory {
        territory: TerritoryId,
    },
    /// The same territory id names more than one block.
    DuplicateTerritory {
        territory: TerritoryId,
    },
    /// A unit listed twice within the same block.
    RepeatedMember {
        unit: UnitKey,
        territory: TerritoryId,
    },
    /// A unit listed again by a later territory after it was already claimed.
    DuplicateMember {
        unit: UnitKey,
        kept: TerritoryId,
        ignored: TerritoryId,
    },
}

impl fmt::Display for DefinitionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTerritory { territory } => {
                write!(f, "territory {territory} has no members")
            }
            Self::DuplicateTerritory { territory } => {
                write!(f, "territory {territory} is defined more than once")
            }
            Self::RepeatedMember { unit, territory } => {
                write!(f, "unit {unit} is listed more than once in {territory}")
            }
            Self::DuplicateMember {
                unit,
                kept,
                ignored,
            } => write!(
                f,
                "unit {unit} is listed in {kept} and {ignored}; keeping {kept}"
            ),
        }
    }
}

/// Inverted `UnitKey -> TerritoryId` mapping plus the resolved member list of
/// every territory (only the units that territory actually claimed, in
/// definition order).
#[derive(Debug, Clone, Default)]
pub struct TerritoryIndex {
    by_unit: HashMap<UnitKey, TerritoryId>,
    groups: HashMap<TerritoryId, Vec<UnitKey>>,
    issues: Vec<DefinitionIssue>,
}

impl TerritoryIndex {
    /// Invert `definition`. The first territory (in definition order) listing a
    /// unit claims it; later listings are ignored and reported as issues.
    pub fn build(definition: &TerritoryDefinition) -> Self {
        let mut by_unit: HashMap<UnitKey, TerritoryId> = HashMap::new();
        let mut groups: HashMap<TerritoryId, Vec<UnitKey>> = HashMap::new();
        let mut issues = Vec::new();
        let mut seen_ids: HashSet<&str> = HashSet::new();

        for entry in definition.entries() {
            if !seen_ids.insert(entry.id.as_str()) {
                issues.push(DefinitionIssue::DuplicateTerritory {
                    territory: entry.id.clone(),
                });
            }
            if entry.members.is_empty() {
                issues.push(DefinitionIssue::EmptyTerritory {
                    territory: entry.id.clone(),
                });
                continue;
            }

            for unit in &entry.members {
                match by_unit.get(unit) {
                    Some(kept) if *kept == entry.id => {
                        issues.push(DefinitionIssue::RepeatedMember {
                            unit: unit.clone(),
                            territory: entry.id.clone(),
                        })
                    }
                    Some(kept) => issues.push(DefinitionIssue::DuplicateMember {
                        unit: unit.clone(),
                        kept: kept.clone(),
                        ignored: entry.id.clone(),
                    }),
                    None => {
                        by_unit.insert(unit.clone(), entry.id.clone());
                        groups
                            .entry(entry.id.clone())
                            .or_default()
                            .push(unit.clone());
                    }
                }
            }
        }

        Self {
            by_unit,
            groups,
            issues,
        }
    }

    pub fn lookup(&self, unit: &UnitKey) -> Option<&TerritoryId> {
        self.by_unit.get(unit)
    }

    /// Units that resolve to `territory`, in definition order. Identical to
    /// [`TerritoryDefinition::members_of`] unless the definition has issues.
    pub fn members(&self, territory: &str) -> &[UnitKey] {
        self.groups
            .get(territory)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn issues(&self) -> &[DefinitionIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.by_unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_unit.is_empty()
    }

    /// Indexed units that the registry does not know about, sorted.
    pub fn unknown_members(&self, registry: &UnitRegistry) -> Vec<UnitKey> {
        let mut unknown: Vec<UnitKey> = self
            .by_unit
            .keys()
            .filter(|unit| !registry.contains(unit))
            .cloned()
            .collect();
        unknown.sort();
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitFeature;

    fn northeast_and_southeast() -> TerritoryDefinition {
        TerritoryDefinition::from_pairs([
            ("Northeast", vec!["Maine", "Vermont"]),
            ("Southeast1", vec!["Georgia"]),
        ])
    }

    #[test]
    fn build_maps_every_listed_unit() {
        let index = TerritoryIndex::build(&northeast_and_southeast());

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.lookup(&UnitKey::from("Maine")).map(String::as_str),
            Some("Northeast")
        );
        assert_eq!(
            index.lookup(&UnitKey::from("Georgia")).map(String::as_str),
            Some("Southeast1")
        );
        assert!(index.issues().is_empty());
    }

    #[test]
    fn build_is_deterministic() {
        let definition = TerritoryDefinition::from_pairs([
            ("Southwest", vec!["Arizona", "California South", "Nevada East"]),
            ("CaliforniaNorth", vec!["California North", "Nevada West"]),
            ("Dup", vec!["Arizona"]),
        ]);

        let first = TerritoryIndex::build(&definition);
        let second = TerritoryIndex::build(&definition);

        for name in ["Arizona", "California South", "Nevada East", "California North", "Nevada West"] {
            let unit = UnitKey::from(name);
            assert_eq!(first.lookup(&unit), second.lookup(&unit));
        }
        assert_eq!(first.members("Southwest"), second.members("Southwest"));
        assert_eq!(first.issues(), second.issues());
    }

    #[test]
    fn first_definition_wins_on_duplicate_membership() {
        let definition = TerritoryDefinition::from_pairs([
            ("A", vec!["Texas North"]),
            ("B", vec!["Texas North", "Louisiana"]),
        ]);

        let index = TerritoryIndex::build(&definition);

        assert_eq!(
            index.lookup(&UnitKey::from("Texas North")).map(String::as_str),
            Some("A")
        );
        assert_eq!(
            index.lookup(&UnitKey::from("Louisiana")).map(String::as_str),
            Some("B")
        );
        assert_eq!(
            index.issues(),
            &[DefinitionIssue::DuplicateMember {
                unit: UnitKey::from("TexasNorth"),
                kept: "A".to_owned(),
                ignored: "B".to_owned(),
            }]
        );
        assert_eq!(index.members("B"), &[UnitKey::from("Louisiana")]);
        assert_eq!(
            definition.members_of("B"),
            &[UnitKey::from("Texas North"), UnitKey::from("Louisiana")]
        );
    }

    #[test]
    fn unit_repeated_inside_one_territory_is_its_own_issue() {
        let definition =
            TerritoryDefinition::from_pairs([("Northeast", vec!["Maine", "Vermont", "Maine"])]);

        let index = TerritoryIndex::build(&definition);

        assert_eq!(
            index.issues(),
            &[DefinitionIssue::RepeatedMember {
                unit: UnitKey::from("Maine"),
                territory: "Northeast".to_owned(),
            }]
        );
        assert_eq!(
            index.issues()[0].to_string(),
            "unit Maine is listed more than once in Northeast"
        );
        assert_eq!(
            index.members("Northeast"),
            &[UnitKey::from("Maine"), UnitKey::from("Vermont")]
        );
    }

    #[test]
    fn lookup_of_unlisted_unit_is_none() {
        let index = TerritoryIndex::build(&northeast_and_southeast());
        assert_eq!(index.lookup(&UnitKey::from("NotARealState")), None);
    }

    #[test]
    fn empty_and_repeated_blocks_are_reported_not_fatal() {
        let definition = TerritoryDefinition::from_pairs([
            ("Florida", vec!["Florida"]),
            ("Nowhere", vec![]),
            ("Florida", vec!["Georgia"]),
        ]);

        let index = TerritoryIndex::build(&definition);

        assert_eq!(
            index.issues(),
            &[
                DefinitionIssue::EmptyTerritory {
                    territory: "Nowhere".to_owned()
                },
                DefinitionIssue::DuplicateTerritory {
                    territory: "Florida".to_owned()
                },
            ]
        );
        assert_eq!(
            index.lookup(&UnitKey::from("Georgia")).map(String::as_str),
            Some("Florida")
        );
        assert_eq!(
            index.members("Florida"),
            &[UnitKey::from("Florida"), UnitKey::from("Georgia")]
        );
        assert!(index.members("Nowhere").is_empty());
    }

    #[test]
    fn members_of_returns_definition_order_or_empty() {
        let definition = northeast_and_southeast();
        assert_eq!(
            definition.members_of("Northeast"),
            &[UnitKey::from("Maine"), UnitKey::from("Vermont")]
        );
        assert!(definition.members_of("Atlantis").is_empty());
    }

    #[test]
    fn definition_deserializes_as_ordered_blocks() {
        let definition: TerritoryDefinition = serde_json::from_str(
            r#"[{"id":"Midwest1","members":["Michigan","Pennsylvania West"]},{"id":"Florida","members":["Florida"]}]"#,
        )
        .expect("parse definition");

        let ids: Vec<&str> = definition.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["Midwest1", "Florida"]);
        assert_eq!(
            definition.members_of("Midwest1")[1],
            UnitKey::from("PennsylvaniaWest")
        );
    }

    #[test]
    fn unknown_members_lists_keys_missing_from_registry() {
        let registry = UnitRegistry::from_features(&[
            UnitFeature::named("Maine"),
            UnitFeature::named("Georgia"),
        ]);
        let index = TerritoryIndex::build(&northeast_and_southeast());

        assert_eq!(index.unknown_members(&registry), vec![UnitKey::from("Vermont")]);
    }

    #[test]
    fn issue_messages_name_both_territories() {
        let issue = DefinitionIssue::DuplicateMember {
            unit: UnitKey::from("Georgia"),
            kept: "Southeast2".to_owned(),
            ignored: "Southeast1".to_owned(),
        };
        assert_eq!(
            issue.to_string(),
            "unit Georgia is listed in Southeast2 and Southeast1; keeping Southeast2"
        );
    }
}
