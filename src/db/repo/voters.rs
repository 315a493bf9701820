//! Student registration, lookup, login and listing.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::info;

use super::Repository;
use crate::db::error::{decode_error, StoreError};
use crate::db::query::Conditions;
use crate::domain::{NewVoter, StudentSummary, Voter, VoterFilter};

const VOTER_COLUMNS: &str = "id, first_name, last_name, date_of_birth, school_id, program, \
     academic_year, student_number, nrc_number, gender, email, phone, address_type, \
     registration_date, has_voted";

const VOTER_SEARCH_COLUMNS: &[&str] = &["student_number", "first_name", "last_name", "email"];

const DUPLICATE_STUDENT_NUMBER: &str = "Student number already registered";

fn voter_from_row(row: &SqliteRow) -> Result<Voter, sqlx::Error> {
    let gender: String = row.try_get("gender")?;
    let address_type: String = row.try_get("address_type")?;

    Ok(Voter {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        date_of_birth: row.try_get("date_of_birth")?,
        school_id: row.try_get("school_id")?,
        program: row.try_get("program")?,
        academic_year: row.try_get("academic_year")?,
        student_number: row.try_get("student_number")?,
        nrc_number: row.try_get("nrc_number")?,
        gender: gender.parse().map_err(decode_error)?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address_type: address_type.parse().map_err(decode_error)?,
        registration_date: row.try_get("registration_date")?,
        has_voted: row.try_get("has_voted")?,
    })
}

impl Repository {
    pub async fn student_number_exists(&self, student_number: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM voters WHERE student_number = ?")
            .bind(student_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Register a voter.
    ///
    /// The existence check gives the friendly rejection in the common case;
    /// the UNIQUE constraint still rejects a concurrent duplicate that slips
    /// past it, with the same `Duplicate` error.
    pub async fn register_voter(&self, voter: &NewVoter) -> Result<i64, StoreError> {
        if self.student_number_exists(&voter.student_number).await? {
            return Err(StoreError::Duplicate(DUPLICATE_STUDENT_NUMBER.to_string()));
        }
        self.insert_voter(voter).await
    }

    /// Insert without the application-level pre-check.
    pub async fn insert_voter(&self, voter: &NewVoter) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO voters (
                first_name, last_name, date_of_birth, school_id, program, academic_year,
                student_number, nrc_number, gender, email, phone, address_type
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&voter.first_name)
        .bind(&voter.last_name)
        .bind(voter.date_of_birth)
        .bind(voter.school_id)
        .bind(&voter.program)
        .bind(&voter.academic_year)
        .bind(&voter.student_number)
        .bind(&voter.nrc_number)
        .bind(voter.gender.as_str())
        .bind(&voter.email)
        .bind(&voter.phone)
        .bind(voter.address_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::on_unique_violation(e, DUPLICATE_STUDENT_NUMBER))?;

        let voter_id = result.last_insert_rowid();
        info!(voter_id, student_number = %voter.student_number, "Voter registered");
        Ok(voter_id)
    }

    pub async fn get_voter(&self, voter_id: i64) -> Result<Option<Voter>, sqlx::Error> {
        let row = sqlx::query(&format!("SELECT {} FROM voters WHERE id = ?", VOTER_COLUMNS))
            .bind(voter_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(voter_from_row).transpose()
    }

    pub async fn find_voter_by_student_number(
        &self,
        student_number: &str,
    ) -> Result<Option<Voter>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM voters WHERE student_number = ?",
            VOTER_COLUMNS
        ))
        .bind(student_number)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(voter_from_row).transpose()
    }

    /// Student login: the student number and national ID must both match.
    pub async fn authenticate_voter(
        &self,
        student_number: &str,
        nrc_number: &str,
    ) -> Result<Option<Voter>, sqlx::Error> {
        let voter = self
            .find_voter_by_student_number(student_number.trim())
            .await?;
        Ok(voter.filter(|v| v.nrc_number == nrc_number.trim()))
    }

    /// Display fields for the candidate nomination form.
    pub async fn student_lookup(
        &self,
        student_number: &str,
    ) -> Result<Option<StudentSummary>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT v.student_number, v.first_name, v.last_name, s.name AS school_name,
                   v.program, v.academic_year
            FROM voters v
            LEFT JOIN schools s ON s.id = v.school_id
            WHERE v.student_number = ?
            "#,
        )
        .bind(student_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> Result<StudentSummary, sqlx::Error> {
            Ok(StudentSummary {
                student_number: r.try_get("student_number")?,
                first_name: r.try_get("first_name")?,
                last_name: r.try_get("last_name")?,
                school_name: r.try_get("school_name")?,
                program: r.try_get("program")?,
                academic_year: r.try_get("academic_year")?,
            })
        })
        .transpose()
    }

    /// List voters matching every present filter, most recent registration first.
    pub async fn list_voters(&self, filter: &VoterFilter) -> Result<Vec<Voter>, sqlx::Error> {
        let conditions = Conditions::new()
            .eq_opt("school_id", filter.school_id)
            .eq_opt("has_voted", filter.has_voted)
            .contains(VOTER_SEARCH_COLUMNS, filter.search.as_deref());

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM voters", VOTER_COLUMNS));
        conditions.push_where(&mut qb);
        qb.push(" ORDER BY registration_date DESC, id DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(voter_from_row).collect()
    }
}
