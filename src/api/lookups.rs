use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::domain::{AcademicYear, Program, School};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramsQuery {
    pub school_id: Option<String>,
}

pub async fn get_schools(State(state): State<AppState>) -> Json<Vec<School>> {
    Json(state.repo.fetch_schools().await)
}

/// Programs for the registration form. An unparseable `schoolId` is treated
/// as absent.
pub async fn get_programs(
    Query(params): Query<ProgramsQuery>,
    State(state): State<AppState>,
) -> Json<Vec<Program>> {
    let school_id = params
        .school_id
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok());
    Json(state.repo.fetch_programs(school_id).await)
}

pub async fn get_academic_years(State(state): State<AppState>) -> Json<Vec<AcademicYear>> {
    Json(state.repo.fetch_academic_years().await)
}
