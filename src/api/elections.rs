use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::{parse_param, AppState};
use crate::domain::{
    CandidateTally, Election, ElectionFilter, ElectionForm, ElectionStatus, ElectionSummary,
    Position, PositionForm,
};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionsQuery {
    pub status: Option<String>,
    pub election_type: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// Election plus its positions, for hydrating the edit form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionDetail {
    #[serde(flatten)]
    pub election: Election,
    pub positions: Vec<Position>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn list_elections(
    Query(params): Query<ElectionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ElectionSummary>>, AppError> {
    if matches!(params.limit, Some(n) if n <= 0) {
        return Err(AppError::BadRequest("limit must be positive".into()));
    }
    let filter = ElectionFilter {
        status: parse_param("status", params.status.as_deref())?,
        election_type: parse_param("electionType", params.election_type.as_deref())?,
        search: params.search,
        limit: params.limit,
    };
    Ok(Json(state.repo.list_elections(&filter).await?))
}

pub async fn create_election(
    State(state): State<AppState>,
    Json(form): Json<ElectionForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new = form.validate()?;
    let id = state.repo.create_election(&new, form.created_by).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn get_election(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ElectionDetail>, AppError> {
    let election = state
        .repo
        .get_election(id)
        .await?
        .ok_or_else(|| election_not_found(id))?;
    let positions = state.repo.list_positions(id).await?;
    Ok(Json(ElectionDetail {
        election,
        positions,
    }))
}

pub async fn update_election(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(form): Json<ElectionForm>,
) -> Result<Json<Election>, AppError> {
    let new = form.validate()?;
    if !state.repo.update_election(id, &new).await? {
        return Err(election_not_found(id));
    }
    let election = state
        .repo
        .get_election(id)
        .await?
        .ok_or_else(|| election_not_found(id))?;
    Ok(Json(election))
}

pub async fn delete_election(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_election(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(election_not_found(id))
    }
}

pub async fn set_election_status(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Value>, AppError> {
    let status: ElectionStatus = body
        .status
        .trim()
        .parse()
        .map_err(|e: crate::domain::ParseEnumError| AppError::BadRequest(e.to_string()))?;
    if !state.repo.set_election_status(id, status).await? {
        return Err(election_not_found(id));
    }
    Ok(Json(json!({ "id": id, "status": status })))
}

pub async fn add_position(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(form): Json<PositionForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let position_id = state.repo.add_position(id, &form).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": position_id }))))
}

/// Positions for the nomination form's position picker. Responds `[]` for
/// an unparseable id, an unknown election, or a failed query.
pub async fn get_positions_by_election(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<Position>> {
    let Ok(election_id) = id.trim().parse::<i64>() else {
        return Json(Vec::new());
    };
    match state.repo.list_positions(election_id).await {
        Ok(positions) => Json(positions),
        Err(e) => {
            warn!(error = %e, election_id, "Failed to fetch positions");
            Json(Vec::new())
        }
    }
}

pub async fn get_election_results(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateTally>>, AppError> {
    if state.repo.get_election(id).await?.is_none() {
        return Err(election_not_found(id));
    }
    Ok(Json(state.repo.election_results(id).await?))
}

fn election_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Election {} not found", id))
}
