//! Aggregate report rows.

use serde::Serialize;

use super::election::ElectionSummary;
use super::enums::ElectionStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_voters: i64,
    pub voters_voted: i64,
    /// Share of registered voters flagged as having voted, 0-100.
    pub turnout_percent: f64,
    pub total_elections: i64,
    pub active_elections: i64,
    pub total_candidates: i64,
    pub approved_candidates: i64,
    pub total_votes: i64,
    pub elections_by_status: Vec<StatusCount>,
    pub recent_elections: Vec<ElectionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: ElectionStatus,
    pub count: i64,
}

/// Vote total for one candidate in one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub candidate_id: i64,
    pub student_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: String,
    pub is_approved: bool,
    pub votes: i64,
}

/// Percentage with one decimal place; zero when there is no denominator.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}
