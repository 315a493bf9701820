use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{parse_flag, parse_param, AppState};
use crate::domain::{RegistrationForm, Voter, VoterFilter};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotersQuery {
    pub school_id: Option<String>,
    pub has_voted: Option<String>,
    pub search: Option<String>,
}

pub async fn register_voter(
    State(state): State<AppState>,
    Json(form): Json<RegistrationForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let voter = form.validate()?;
    let id = state.repo.register_voter(&voter).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "studentNumber": voter.student_number })),
    ))
}

/// Student details for the nomination form. Responds `{}` when the student
/// is unknown or the lookup fails.
pub async fn get_student_lookup(
    Path(student_number): Path<String>,
    State(state): State<AppState>,
) -> Json<Value> {
    match state.repo.student_lookup(student_number.trim()).await {
        Ok(Some(summary)) => Json(serde_json::to_value(summary).unwrap_or_else(|_| json!({}))),
        Ok(None) => Json(json!({})),
        Err(e) => {
            warn!(error = %e, student_number = %student_number, "Student lookup failed");
            Json(json!({}))
        }
    }
}

pub async fn list_voters(
    Query(params): Query<VotersQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Voter>>, AppError> {
    let filter = VoterFilter {
        school_id: parse_param("schoolId", params.school_id.as_deref())?,
        has_voted: parse_flag("hasVoted", params.has_voted.as_deref())?,
        search: params.search,
    };
    Ok(Json(state.repo.list_voters(&filter).await?))
}
