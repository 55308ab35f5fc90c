use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use territory_map_shared::{MapConfig, MapModel, MapPayload, UnitFeature};
use tracing::{info, warn};

use crate::state::MapSnapshot;

#[derive(Debug)]
pub enum DataLoadError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
}

impl fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            Self::Serialize(source) => write!(f, "failed to serialize map payload: {source}"),
        }
    }
}

impl std::error::Error for DataLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::Serialize(source) => Some(source),
        }
    }
}

/// Read the feature file and territory config, validate them by building the
/// territory index once, and pre-serialize the payload.
pub async fn load(units_path: &Path, territories_path: &Path) -> Result<MapSnapshot, DataLoadError> {
    let units: Vec<UnitFeature> = read_json(units_path).await?;
    let config: MapConfig = read_json(territories_path).await?;
    let payload = MapPayload { config, units };

    let model = MapModel::from_payload(&payload);
    log_model_diagnostics(&model);

    let snapshot =
        MapSnapshot::from_payload(&payload, &model).map_err(DataLoadError::Serialize)?;
    info!(
        units = snapshot.unit_count,
        territories = snapshot.territory_count,
        contacts = snapshot.contact_count,
        "loaded map data"
    );
    Ok(snapshot)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|source| DataLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&raw).map_err(|source| DataLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every issue is logged once, here, at build time.
fn log_model_diagnostics(model: &MapModel) {
    for issue in model.issues() {
        warn!(%issue, "territory definition issue");
    }
    for unit in model.registry.duplicates() {
        warn!(%unit, "duplicate unit in feature file; keeping the first");
    }
    for unit in model.index.unknown_members(&model.registry) {
        warn!(%unit, "territory member has no matching feature");
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[tokio::test]
    async fn loads_valid_files_into_snapshot() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let units = write(
            &dir,
            "units.json",
            r#"[{"name":"Maine","path":"M0,0Z"},{"name":"Vermont"},{"name":"Alabama","salesRep":"John Doe","salesRepContact":"john.doe@email.com"}]"#,
        );
        let territories = write(
            &dir,
            "territories.json",
            r#"{"territories":[{"id":"Northeast","members":["Maine","Vermont"]},{"id":"Southeast2","members":["Alabama","Maine"]}]}"#,
        );

        let snapshot = load(&units, &territories).await.expect("load map data");

        assert_eq!(snapshot.unit_count, 3);
        assert_eq!(snapshot.territory_count, 2);
        assert_eq!(snapshot.contact_count, 1);
        assert_eq!(snapshot.definition_issues.len(), 1);

        let payload: MapPayload =
            serde_json::from_slice(&snapshot.payload_json).expect("payload is valid JSON");
        assert_eq!(payload.units.len(), 3);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let territories = write(&dir, "territories.json", r#"{"territories":[]}"#);

        let err = load(&dir.path().join("nope.json"), &territories)
            .await
            .expect_err("missing units file must fail");
        assert!(matches!(err, DataLoadError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let units = write(&dir, "units.json", "[]");
        let territories = write(&dir, "territories.json", r#"{"territories": {"not": "a list"}}"#);

        let err = load(&units, &territories)
            .await
            .expect_err("malformed config must fail");
        assert!(matches!(err, DataLoadError::Parse { .. }));
    }
}
