//! Nominations of registered students to positions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::validation::{optional, required, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i64,
    pub election_id: i64,
    pub student_number: String,
    /// Position name as free text; not a reference to `positions`.
    pub position: String,
    pub manifesto: Option<String>,
    pub photo_path: Option<String>,
    pub is_approved: bool,
    pub created_at: NaiveDateTime,
}

/// Listing row: a candidate with voter and election display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub election_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub election_id: i64,
    pub student_number: String,
    pub position: String,
    pub manifesto: Option<String>,
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateForm {
    pub election_id: Option<i64>,
    pub student_number: String,
    pub position: String,
    pub manifesto: Option<String>,
    pub photo_path: Option<String>,
}

impl CandidateForm {
    pub fn validate(&self) -> Result<NewCandidate, ValidationError> {
        Ok(NewCandidate {
            election_id: self
                .election_id
                .ok_or(ValidationError::Missing("election_id"))?,
            student_number: required("student_number", &self.student_number)?,
            position: required("position", &self.position)?,
            manifesto: optional(self.manifesto.as_deref()),
            photo_path: optional(self.photo_path.as_deref()),
        })
    }
}

/// Optional filters for the candidate listing.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub election_id: Option<i64>,
    pub approved: Option<bool>,
    pub search: Option<String>,
}
