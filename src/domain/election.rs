//! Elections and the positions contested within them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{ElectionStatus, ElectionType};
use super::scope::{deserialize_selection, Scope};
use super::validation::{optional, parse_datetime, required, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub election_type: ElectionType,
    pub school: Scope,
    pub program: Scope,
    pub academic_year: Scope,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: ElectionStatus,
    pub created_by: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Listing row: an election with its aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSummary {
    #[serde(flatten)]
    pub election: Election,
    pub candidate_count: i64,
    pub vote_count: i64,
    pub creator_name: Option<String>,
}

/// A validated election ready for insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewElection {
    pub name: String,
    pub description: Option<String>,
    pub election_type: ElectionType,
    pub school: Scope,
    pub program: Scope,
    pub academic_year: Scope,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: ElectionStatus,
}

/// Election create/edit submission.
///
/// Scope fields arrive as multi-select lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElectionForm {
    pub name: String,
    pub description: Option<String>,
    pub election_type: String,
    #[serde(deserialize_with = "deserialize_selection")]
    pub school: Vec<String>,
    #[serde(deserialize_with = "deserialize_selection")]
    pub program: Vec<String>,
    #[serde(deserialize_with = "deserialize_selection")]
    pub academic_year: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub status: Option<String>,
    pub created_by: Option<i64>,
}

impl ElectionForm {
    pub fn validate(&self) -> Result<NewElection, ValidationError> {
        let name = required("name", &self.name)?;
        let election_type = required("election_type", &self.election_type)?.parse()?;
        let start_date = parse_datetime("start_date", &self.start_date)?;
        let end_date = parse_datetime("end_date", &self.end_date)?;
        if end_date <= start_date {
            return Err(ValidationError::EndBeforeStart);
        }
        let status = match optional(self.status.as_deref()) {
            Some(s) => s.parse()?,
            None => ElectionStatus::default(),
        };

        Ok(NewElection {
            name,
            description: optional(self.description.as_deref()),
            election_type,
            school: Scope::from_selection(&self.school),
            program: Scope::from_selection(&self.program),
            academic_year: Scope::from_selection(&self.academic_year),
            start_date,
            end_date,
            status,
        })
    }
}

/// Optional filters for the election listing. Absent filters add no condition.
#[derive(Debug, Clone, Default)]
pub struct ElectionFilter {
    pub status: Option<ElectionStatus>,
    pub election_type: Option<ElectionType>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: i64,
    pub election_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionForm {
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ElectionForm {
        ElectionForm {
            name: "SU General Elections".to_string(),
            description: Some("  ".to_string()),
            election_type: "Student Union".to_string(),
            school: vec![],
            program: vec!["3".to_string(), "8".to_string()],
            academic_year: vec!["all".to_string(), "2".to_string()],
            start_date: "2025-05-01T08:00".to_string(),
            end_date: "2025-05-02T17:00".to_string(),
            status: None,
            created_by: Some(1),
        }
    }

    #[test]
    fn test_validate_builds_scopes() {
        let election = form().validate().unwrap();
        assert_eq!(election.school, Scope::Selected(Vec::new()));
        assert_eq!(election.school.encode(), "");
        assert_eq!(
            election.program,
            Scope::Selected(vec!["3".to_string(), "8".to_string()])
        );
        assert_eq!(election.academic_year, Scope::All);
        assert_eq!(election.description, None);
        assert_eq!(election.status, ElectionStatus::Draft);
    }

    #[test]
    fn test_numeric_ids_accepted_from_json() {
        let form: ElectionForm = serde_json::from_str(
            r#"{"name": "Reps", "electionType": "Association", "program": [2, 5],
                "startDate": "2025-05-01T08:00", "endDate": "2025-05-02T17:00"}"#,
        )
        .unwrap();
        let election = form.validate().unwrap();
        assert_eq!(election.program.encode(), r#"["2","5"]"#);
        assert_eq!(election.academic_year.encode(), "");
    }

    #[test]
    fn test_end_must_follow_start() {
        let mut f = form();
        f.end_date = f.start_date.clone();
        assert_eq!(f.validate().unwrap_err(), ValidationError::EndBeforeStart);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut f = form();
        f.election_type = "Referendum".to_string();
        assert!(matches!(f.validate(), Err(ValidationError::BadEnum(_))));
    }

    #[test]
    fn test_explicit_status_parsed() {
        let mut f = form();
        f.status = Some("active".to_string());
        assert_eq!(f.validate().unwrap().status, ElectionStatus::Active);
    }
}
