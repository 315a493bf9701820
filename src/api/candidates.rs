use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_flag, parse_param, AppState};
use crate::domain::{CandidateFilter, CandidateForm, CandidateSummary};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatesQuery {
    pub election_id: Option<String>,
    pub approved: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalUpdate {
    pub approved: bool,
}

pub async fn list_candidates(
    Query(params): Query<CandidatesQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let filter = CandidateFilter {
        election_id: parse_param("electionId", params.election_id.as_deref())?,
        approved: parse_flag("approved", params.approved.as_deref())?,
        search: params.search,
    };
    Ok(Json(state.repo.list_candidates(&filter).await?))
}

pub async fn create_candidate(
    State(state): State<AppState>,
    Json(form): Json<CandidateForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let candidate = form.validate()?;
    let id = state.repo.add_candidate(&candidate).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn set_candidate_approval(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<ApprovalUpdate>,
) -> Result<Json<Value>, AppError> {
    if !state.repo.set_candidate_approval(id, body.approved).await? {
        return Err(candidate_not_found(id));
    }
    Ok(Json(json!({ "id": id, "isApproved": body.approved })))
}

pub async fn delete_candidate(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_candidate(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(candidate_not_found(id))
    }
}

fn candidate_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Candidate {} not found", id))
}
