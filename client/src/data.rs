use territory_map_shared::MapPayload;

/// Fetch units, territory definitions, contacts and palette in one request.
pub async fn fetch_map_payload() -> Result<MapPayload, String> {
    let resp = gloo_net::http::Request::get("/api/map")
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<MapPayload>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}
