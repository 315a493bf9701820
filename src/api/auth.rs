use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::domain::{AdminUser, Voter};
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoterLogin {
    pub student_number: String,
    pub nrc_number: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}

pub async fn login_voter(
    State(state): State<AppState>,
    Json(body): Json<VoterLogin>,
) -> Result<Json<Voter>, AppError> {
    let voter = state
        .repo
        .authenticate_voter(&body.student_number, &body.nrc_number)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid student number or NRC number".into()))?;

    info!(voter_id = voter.id, "Voter logged in");
    Ok(Json(voter))
}

pub async fn login_admin(
    State(state): State<AppState>,
    Json(body): Json<AdminLogin>,
) -> Result<Json<AdminUser>, AppError> {
    let admin = state
        .repo
        .authenticate_admin(&body.username, &body.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".into()))?;

    info!(admin_id = admin.id, username = %admin.username, "Admin logged in");
    Ok(Json(admin))
}
