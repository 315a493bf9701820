pub mod auth;
pub mod candidates;
pub mod elections;
pub mod health;
pub mod lookups;
pub mod reports;
pub mod voters;
pub mod votes;

use crate::config::Config;
use crate::db::Repository;
use crate::error::AppError;
use axum::{
    routing::{get, post},
    Router,
};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        Self { repo, config }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        // Form population
        .route("/api/schools", get(lookups::get_schools))
        .route("/api/programs", get(lookups::get_programs))
        .route("/api/academic-years", get(lookups::get_academic_years))
        .route(
            "/api/elections/:id/positions",
            get(elections::get_positions_by_election),
        )
        .route(
            "/api/students/:student_number",
            get(voters::get_student_lookup),
        )
        // Student facing
        .route("/api/voters", post(voters::register_voter))
        .route("/api/login/voter", post(auth::login_voter))
        .route("/api/login/admin", post(auth::login_admin))
        .route("/api/votes", post(votes::cast_vote))
        // Administration
        .route(
            "/admin/elections",
            get(elections::list_elections).post(elections::create_election),
        )
        .route(
            "/admin/elections/:id",
            get(elections::get_election)
                .put(elections::update_election)
                .delete(elections::delete_election),
        )
        .route(
            "/admin/elections/:id/status",
            post(elections::set_election_status),
        )
        .route("/admin/elections/:id/positions", post(elections::add_position))
        .route(
            "/admin/elections/:id/results",
            get(elections::get_election_results),
        )
        .route(
            "/admin/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route(
            "/admin/candidates/:id",
            axum::routing::delete(candidates::delete_candidate),
        )
        .route(
            "/admin/candidates/:id/approval",
            post(candidates::set_candidate_approval),
        )
        .route("/admin/voters", get(voters::list_voters))
        .route("/admin/dashboard", get(reports::get_dashboard))
        .layer(cors)
        .with_state(state)
}

/// Parse an optional query parameter. Absent or blank means "no filter".
pub(crate) fn parse_param<T: FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", name, raw))),
    }
}

/// Parse an optional boolean query parameter (`true`/`false`/`1`/`0`).
pub(crate) fn parse_flag(name: &str, value: Option<&str>) -> Result<Option<bool>, AppError> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid {}: {}",
            name, other
        ))),
    }
}
