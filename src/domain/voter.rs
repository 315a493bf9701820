//! Registered students.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::{AddressType, Gender};
use super::validation::{parse_date, required, ValidationError};

/// A registered student eligible to log in and vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub school_id: Option<i64>,
    pub program: String,
    pub academic_year: String,
    /// Globally unique.
    pub student_number: String,
    #[serde(skip_serializing)]
    pub nrc_number: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address_type: AddressType,
    pub registration_date: NaiveDateTime,
    pub has_voted: bool,
}

impl Voter {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated voter ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVoter {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub school_id: Option<i64>,
    pub program: String,
    pub academic_year: String,
    pub student_number: String,
    pub nrc_number: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address_type: AddressType,
}

/// Self-registration submission, as typed by the student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub school_id: Option<i64>,
    pub program: String,
    pub academic_year: String,
    pub student_number: String,
    pub nrc_number: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub address_type: String,
}

impl RegistrationForm {
    /// Check presence of every required field and parse typed ones.
    pub fn validate(&self) -> Result<NewVoter, ValidationError> {
        Ok(NewVoter {
            first_name: required("first_name", &self.first_name)?,
            last_name: required("last_name", &self.last_name)?,
            date_of_birth: parse_date("date_of_birth", &self.date_of_birth)?,
            school_id: self.school_id,
            program: required("program", &self.program)?,
            academic_year: required("academic_year", &self.academic_year)?,
            student_number: required("student_number", &self.student_number)?,
            nrc_number: required("nrc_number", &self.nrc_number)?,
            gender: required("gender", &self.gender)?.parse()?,
            email: required("email", &self.email)?,
            phone: required("phone", &self.phone)?,
            address_type: required("address_type", &self.address_type)?.parse()?,
        })
    }
}

/// Public-facing view returned by the student lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub school_name: Option<String>,
    pub program: String,
    pub academic_year: String,
}

/// Optional filters for the voter listing.
#[derive(Debug, Clone, Default)]
pub struct VoterFilter {
    pub school_id: Option<i64>,
    pub has_voted: Option<bool>,
    pub search: Option<String>,
}
