//! Candidate nomination, approval and the filtered candidate listing.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::info;

use super::Repository;
use crate::db::error::StoreError;
use crate::db::query::Conditions;
use crate::domain::{Candidate, CandidateFilter, CandidateSummary, NewCandidate};

const CANDIDATE_COLUMNS: &str = "c.id, c.election_id, c.student_number, c.position, \
     c.manifesto, c.photo_path, c.is_approved, c.created_at";

const CANDIDATE_SEARCH_COLUMNS: &[&str] = &[
    "c.student_number",
    "c.position",
    "v.first_name",
    "v.last_name",
    "v.email",
];

const DUPLICATE_CANDIDATE: &str = "This student is already a candidate in this election";

fn candidate_from_row(row: &SqliteRow) -> Result<Candidate, sqlx::Error> {
    Ok(Candidate {
        id: row.try_get("id")?,
        election_id: row.try_get("election_id")?,
        student_number: row.try_get("student_number")?,
        position: row.try_get("position")?,
        manifesto: row.try_get("manifesto")?,
        photo_path: row.try_get("photo_path")?,
        is_approved: row.try_get("is_approved")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Repository {
    /// Nominate a registered student for a position in an election.
    ///
    /// # Errors
    /// `NotFound` if the election or the student does not exist, `Duplicate`
    /// if the student is already a candidate in that election.
    pub async fn add_candidate(&self, candidate: &NewCandidate) -> Result<i64, StoreError> {
        if self.get_election(candidate.election_id).await?.is_none() {
            return Err(StoreError::NotFound(format!(
                "Election {} not found",
                candidate.election_id
            )));
        }
        if !self
            .student_number_exists(&candidate.student_number)
            .await?
        {
            return Err(StoreError::NotFound(format!(
                "No registered student with number {}",
                candidate.student_number
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO candidates (election_id, student_number, position, manifesto, photo_path)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(candidate.election_id)
        .bind(&candidate.student_number)
        .bind(&candidate.position)
        .bind(candidate.manifesto.as_deref())
        .bind(candidate.photo_path.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::on_unique_violation(e, DUPLICATE_CANDIDATE))?;

        let candidate_id = result.last_insert_rowid();
        info!(
            candidate_id,
            election_id = candidate.election_id,
            student_number = %candidate.student_number,
            position = %candidate.position,
            "Candidate added"
        );
        Ok(candidate_id)
    }

    pub async fn get_candidate(&self, candidate_id: i64) -> Result<Option<Candidate>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM candidates c WHERE c.id = ?",
            CANDIDATE_COLUMNS
        ))
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(candidate_from_row).transpose()
    }

    pub async fn set_candidate_approval(
        &self,
        candidate_id: i64,
        approved: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE candidates SET is_approved = ? WHERE id = ?")
            .bind(approved)
            .bind(candidate_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a candidate and the votes cast for them. Irreversible.
    pub async fn delete_candidate(&self, candidate_id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM votes WHERE candidate_id = ?")
            .bind(candidate_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM candidates WHERE id = ?")
            .bind(candidate_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }
        tx.commit().await?;
        info!(candidate_id, "Candidate deleted");
        Ok(true)
    }

    /// List candidates matching every present filter, joined to voter and
    /// election display fields.
    pub async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateSummary>, sqlx::Error> {
        let conditions = Conditions::new()
            .eq_opt("c.election_id", filter.election_id)
            .eq_opt("c.is_approved", filter.approved)
            .contains(CANDIDATE_SEARCH_COLUMNS, filter.search.as_deref());

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            r#"
            SELECT {}, v.first_name, v.last_name, e.name AS election_name
            FROM candidates c
            LEFT JOIN voters v ON v.student_number = c.student_number
            LEFT JOIN elections e ON e.id = c.election_id"#,
            CANDIDATE_COLUMNS
        ));
        conditions.push_where(&mut qb);
        qb.push(" ORDER BY c.election_id DESC, c.position ASC, v.last_name ASC, c.id ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<CandidateSummary, sqlx::Error> {
                Ok(CandidateSummary {
                    candidate: candidate_from_row(row)?,
                    first_name: row.try_get("first_name")?,
                    last_name: row.try_get("last_name")?,
                    election_name: row.try_get("election_name")?,
                })
            })
            .collect()
    }
}
