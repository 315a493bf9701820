//! Lookup tables used to populate registration and election forms.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub school_id: Option<i64>,
    pub school_name: Option<String>,
    pub duration_years: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    pub id: i64,
    pub name: String,
    pub code: String,
}
