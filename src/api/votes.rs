use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub election_id: i64,
    pub voter_id: i64,
    pub candidate_id: i64,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<VoteRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let ip = client_ip(&headers);
    let id = state
        .repo
        .record_vote(body.election_id, body.voter_id, body.candidate_id, ip.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// First address in `x-forwarded-for`, if any.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
