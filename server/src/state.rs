use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use territory_map_shared::{MapModel, MapPayload};

use crate::config::client_dist_dir;

/// Map data as served. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct MapSnapshot {
    pub payload_json: Arc<Bytes>,
    pub etag: String,
    pub unit_count: usize,
    pub territory_count: usize,
    pub contact_count: usize,
    pub definition_issues: Vec<String>,
    pub loaded_at: String,
}

impl MapSnapshot {
    /// `model` must be the one built from `payload`; counts and issues come
    /// from it while the bytes come from `payload`.
    pub fn from_payload(
        payload: &MapPayload,
        model: &MapModel,
    ) -> Result<Self, serde_json::Error> {
        let json = Bytes::from(serde_json::to_vec(payload)?);
        Ok(Self {
            etag: map_etag(&json),
            payload_json: Arc::new(json),
            unit_count: model.registry.len(),
            territory_count: model.definition.len(),
            contact_count: model.contacts.len(),
            definition_issues: model.issues().iter().map(ToString::to_string).collect(),
            loaded_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Content-derived ETag, stable across restarts with identical data.
fn map_etag(json: &[u8]) -> String {
    format!("\"map-{:08x}\"", crc32fast::hash(json))
}

#[derive(Clone)]
pub struct AppState {
    pub map: Arc<MapSnapshot>,
    pub client_dist: PathBuf,
}

impl AppState {
    pub fn new(map: MapSnapshot) -> Self {
        Self {
            map: Arc::new(map),
            client_dist: client_dist_dir(),
        }
    }
}
