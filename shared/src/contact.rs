use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::unit::{UnitFeature, UnitKey};

/// Shown for any missing contact field.
pub const PLACEHOLDER: &str = "N/A";

/// Sales contact attached to a unit. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    #[serde(default, alias = "salesRep")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_name: Option<String>,
    #[serde(default, alias = "salesRepContact")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_contact: Option<String>,
}

impl ContactRecord {
    pub fn new(rep_name: &str, rep_contact: &str) -> Self {
        Self {
            rep_name: Some(rep_name.to_owned()),
            rep_contact: Some(rep_contact.to_owned()),
        }
    }

    pub fn is_empty(&self) -> bool {
        non_blank(self.rep_name.as_deref()).is_none()
            && non_blank(self.rep_contact.as_deref()).is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Contact records keyed by unit.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    records: HashMap<UnitKey, ContactRecord>,
}

impl MetadataStore {
    /// Collect contact fields carried on feature properties. Features without
    /// any contact field get no record.
    pub fn from_features(features: &[UnitFeature]) -> Self {
        let records = features
            .iter()
            .filter_map(|feature| {
                let record = ContactRecord {
                    rep_name: feature.sales_rep.clone(),
                    rep_contact: feature.sales_rep_contact.clone(),
                };
                (!record.is_empty()).then(|| (feature.key(), record))
            })
            .collect();
        Self { records }
    }

    /// Merge records from the map config. Config entries win field by field
    /// over what the features carried.
    pub fn merge(&mut self, overrides: &BTreeMap<String, ContactRecord>) {
        for (name, record) in overrides {
            let entry = self.records.entry(UnitKey::normalize(name)).or_default();
            if non_blank(record.rep_name.as_deref()).is_some() {
                entry.rep_name = record.rep_name.clone();
            }
            if non_blank(record.rep_contact.as_deref()).is_some() {
                entry.rep_contact = record.rep_contact.clone();
            }
        }
    }

    pub fn lookup(&self, unit: &UnitKey) -> Option<&ContactRecord> {
        self.records.get(unit)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Resolved tooltip text: both contact fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub name: String,
    pub rep_name: String,
    pub rep_contact: String,
}

impl TooltipContent {
    pub fn resolve(name: &str, record: Option<&ContactRecord>) -> Self {
        let rep_name = non_blank(record.and_then(|r| r.rep_name.as_deref()));
        let rep_contact = non_blank(record.and_then(|r| r.rep_contact.as_deref()));
        Self {
            name: name.to_owned(),
            rep_name: rep_name.unwrap_or(PLACEHOLDER).to_owned(),
            rep_contact: rep_contact.unwrap_or(PLACEHOLDER).to_owned(),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "{}<br/>Sales Rep: {}<br/>Contact: {}",
            escape_html(&self.name),
            escape_html(&self.rep_name),
            escape_html(&self.rep_contact)
        )
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
