use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::domain::DashboardStats;
use crate::error::AppError;

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.repo.dashboard_stats().await?))
}
