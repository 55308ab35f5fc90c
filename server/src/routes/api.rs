use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::config::MAP_CACHE_CONTROL;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let map = &state.map;
    Json(serde_json::json!({
        "status": "ok",
        "units": map.unit_count,
        "territories": map.territory_count,
        "contacts": map.contact_count,
        "definition_issues": map.definition_issues,
        "loaded_at": map.loaded_at,
    }))
}

/// Serve the pre-serialized map payload (territories, palette, contacts, units).
pub async fn get_map(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let map = &state.map;
    if if_none_match_matches(&headers, &map.etag) {
        return not_modified_response(MAP_CACHE_CONTROL, Some(map.etag.as_str()));
    }

    json_bytes_response(
        (*map.payload_json).clone(),
        MAP_CACHE_CONTROL,
        Some(map.etag.as_str()),
    )
}

fn json_bytes_response(body: Bytes, cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use territory_map_shared::{
        MapConfig, MapModel, MapPayload, TerritoryDefinition, UnitFeature, UnitKey,
    };
    use tower::ServiceExt;

    use super::if_none_match_matches;
    use crate::state::{AppState, MapSnapshot};

    fn scenario_state() -> AppState {
        let mut georgia = UnitFeature::named("Georgia");
        georgia.sales_rep = Some("John Doe".to_owned());
        let payload = MapPayload {
            config: MapConfig {
                territories: TerritoryDefinition::from_pairs([
                    ("Northeast", vec!["Maine", "Vermont"]),
                    ("Southeast1", vec!["Georgia"]),
                ]),
                ..MapConfig::default()
            },
            units: vec![
                UnitFeature::named("Maine"),
                UnitFeature::named("Vermont"),
                georgia,
            ],
        };
        let model = MapModel::from_payload(&payload);
        AppState::new(MapSnapshot::from_payload(&payload, &model).expect("build snapshot"))
    }

    async fn spawn_test_server(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let app = crate::app::build_app(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        (addr, handle)
    }

    #[test]
    fn if_none_match_supports_weak_and_multiple_etags() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::IF_NONE_MATCH,
            axum::http::HeaderValue::from_static("W/\"other\", \"map-0badf00d\""),
        );
        assert!(if_none_match_matches(&headers, "\"map-0badf00d\""));
        assert!(!if_none_match_matches(&headers, "\"map-12345678\""));
    }

    #[tokio::test]
    async fn map_endpoint_payload_drives_a_working_model() {
        let app = crate::app::build_app(scenario_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/map")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("map request");
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let body = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let payload: MapPayload = serde_json::from_slice(&body).expect("parse payload");
        let model = MapModel::from_payload(&payload);

        assert_eq!(
            model.index.members("Northeast"),
            &[UnitKey::from("Maine"), UnitKey::from("Vermont")]
        );
        assert_eq!(
            model.tooltip_for(&UnitKey::from("Georgia")).to_html(),
            "Georgia<br/>Sales Rep: John Doe<br/>Contact: N/A"
        );
    }

    #[tokio::test]
    async fn map_endpoint_returns_not_modified_when_etag_matches() {
        let (addr, server_handle) = spawn_test_server(scenario_state()).await;
        let base_url = format!("http://{addr}");
        let client = reqwest::Client::new();

        let first = client
            .get(format!("{base_url}/api/map"))
            .send()
            .await
            .expect("map request should succeed");
        let first_status = first.status();
        let first_etag = first
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("etag header should be present");

        assert_eq!(first_status, reqwest::StatusCode::OK);

        let second = client
            .get(format!("{base_url}/api/map"))
            .header(reqwest::header::IF_NONE_MATCH, first_etag)
            .send()
            .await
            .expect("conditional map request should succeed");

        assert_eq!(second.status(), reqwest::StatusCode::NOT_MODIFIED);
        assert_eq!(
            second
                .headers()
                .get(reqwest::header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some(crate::config::MAP_CACHE_CONTROL)
        );

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn health_reports_counts_and_issues() {
        let (addr, server_handle) = spawn_test_server(scenario_state()).await;

        let health = reqwest::Client::new()
            .get(format!("http://{addr}/api/health"))
            .send()
            .await
            .expect("health request")
            .error_for_status()
            .expect("health status")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");

        assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert_eq!(health.get("units").and_then(|v| v.as_u64()), Some(3));
        assert_eq!(health.get("territories").and_then(|v| v.as_u64()), Some(2));
        assert_eq!(health.get("contacts").and_then(|v| v.as_u64()), Some(1));
        assert_eq!(
            health
                .get("definition_issues")
                .and_then(|v| v.as_array())
                .map(Vec::len),
            Some(0)
        );

        server_handle.abort();
        let _ = server_handle.await;
    }
}
