//! Election lifecycle, positions, and the filtered election listing.

use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::info;

use super::Repository;
use crate::db::error::{decode_error, StoreError};
use crate::db::query::Conditions;
use crate::domain::validation::{optional, required};
use crate::domain::{
    Election, ElectionFilter, ElectionStatus, ElectionSummary, ElectionType, NewElection, Position,
    PositionForm, Scope,
};

const ELECTION_COLUMNS: &str = "e.id, e.name, e.description, e.election_type, e.school, \
     e.program, e.academic_year, e.start_date, e.end_date, e.status, e.created_by, \
     e.created_at, e.updated_at";

const ELECTION_SEARCH_COLUMNS: &[&str] = &["e.name", "e.description"];

/// Insert an election and the default positions for its type.
///
/// Runs on the caller's connection so it can join an open transaction.
pub(crate) async fn insert_election(
    conn: &mut SqliteConnection,
    new: &NewElection,
    created_by: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO elections (
            name, description, election_type, school, program, academic_year,
            start_date, end_date, status, created_by
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(new.description.as_deref())
    .bind(new.election_type.as_str())
    .bind(new.school.encode())
    .bind(new.program.encode())
    .bind(new.academic_year.encode())
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(new.status.as_str())
    .bind(created_by)
    .execute(&mut *conn)
    .await?;

    let election_id = result.last_insert_rowid();
    insert_default_positions(conn, election_id, new.election_type).await?;
    Ok(election_id)
}

async fn insert_default_positions(
    conn: &mut SqliteConnection,
    election_id: i64,
    election_type: ElectionType,
) -> Result<(), sqlx::Error> {
    for name in election_type.default_positions() {
        sqlx::query("INSERT INTO positions (election_id, name) VALUES (?, ?)")
            .bind(election_id)
            .bind(*name)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn election_from_row(row: &SqliteRow) -> Result<Election, sqlx::Error> {
    let election_type: String = row.try_get("election_type")?;
    let status: String = row.try_get("status")?;
    let school: String = row.try_get("school")?;
    let program: String = row.try_get("program")?;
    let academic_year: String = row.try_get("academic_year")?;

    Ok(Election {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        election_type: election_type.parse().map_err(decode_error)?,
        school: Scope::decode(&school),
        program: Scope::decode(&program),
        academic_year: Scope::decode(&academic_year),
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        status: status.parse().map_err(decode_error)?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn election_conditions(filter: &ElectionFilter) -> Conditions {
    Conditions::new()
        .eq_opt("e.status", filter.status.map(|s| s.as_str()))
        .eq_opt("e.election_type", filter.election_type.map(|t| t.as_str()))
        .contains(ELECTION_SEARCH_COLUMNS, filter.search.as_deref())
}

impl Repository {
    /// Create an election together with its default positions, atomically.
    pub async fn create_election(
        &self,
        new: &NewElection,
        created_by: Option<i64>,
    ) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let election_id = insert_election(&mut *tx, new, created_by).await?;
        tx.commit().await?;

        info!(
            election_id,
            name = %new.name,
            election_type = %new.election_type,
            "Election created"
        );
        Ok(election_id)
    }

    pub async fn get_election(&self, election_id: i64) -> Result<Option<Election>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM elections e WHERE e.id = ?",
            ELECTION_COLUMNS
        ))
        .bind(election_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(election_from_row).transpose()
    }

    /// Overwrite an election's editable fields. Positions are left as they are.
    ///
    /// Returns `false` if no election has this id.
    pub async fn update_election(
        &self,
        election_id: i64,
        new: &NewElection,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE elections SET
                name = ?, description = ?, election_type = ?, school = ?, program = ?,
                academic_year = ?, start_date = ?, end_date = ?, status = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.election_type.as_str())
        .bind(new.school.encode())
        .bind(new.program.encode())
        .bind(new.academic_year.encode())
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.status.as_str())
        .bind(election_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_election_status(
        &self,
        election_id: i64,
        status: ElectionStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE elections SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(election_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!(election_id, status = %status, "Election status changed");
        }
        Ok(result.rows_affected() > 0)
    }

    /// Delete an election and every row that depends on it.
    ///
    /// Votes, candidates and positions go in the same transaction, so no
    /// orphans are left behind. Irreversible.
    pub async fn delete_election(&self, election_id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let votes = sqlx::query(
            r#"
            DELETE FROM votes
            WHERE election_id = ?
               OR candidate_id IN (SELECT id FROM candidates WHERE election_id = ?)
            "#,
        )
        .bind(election_id)
        .bind(election_id)
        .execute(&mut *tx)
        .await?;

        let candidates = sqlx::query("DELETE FROM candidates WHERE election_id = ?")
            .bind(election_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM positions WHERE election_id = ?")
            .bind(election_id)
            .execute(&mut *tx)
            .await?;

        let election = sqlx::query("DELETE FROM elections WHERE id = ?")
            .bind(election_id)
            .execute(&mut *tx)
            .await?;

        if election.rows_affected() == 0 {
            // Nothing to delete; dropping the transaction rolls back.
            return Ok(false);
        }

        tx.commit().await?;
        info!(
            election_id,
            votes_removed = votes.rows_affected(),
            candidates_removed = candidates.rows_affected(),
            "Election deleted"
        );
        Ok(true)
    }

    /// List elections matching every present filter, newest first, with
    /// candidate and vote counts and the creating admin's username.
    pub async fn list_elections(
        &self,
        filter: &ElectionFilter,
    ) -> Result<Vec<ElectionSummary>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            r#"
            SELECT {},
                   a.username AS creator_name,
                   COUNT(DISTINCT c.id) AS candidate_count,
                   COUNT(DISTINCT v.id) AS vote_count
            FROM elections e
            LEFT JOIN candidates c ON c.election_id = e.id
            LEFT JOIN votes v ON v.election_id = e.id
            LEFT JOIN admin_users a ON a.id = e.created_by"#,
            ELECTION_COLUMNS
        ));
        election_conditions(filter).push_where(&mut qb);
        qb.push(" GROUP BY e.id ORDER BY e.created_at DESC, e.id DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<ElectionSummary, sqlx::Error> {
                Ok(ElectionSummary {
                    election: election_from_row(row)?,
                    candidate_count: row.try_get("candidate_count")?,
                    vote_count: row.try_get("vote_count")?,
                    creator_name: row.try_get("creator_name")?,
                })
            })
            .collect()
    }

    // =========================================================================
    // Positions
    // =========================================================================

    pub async fn list_positions(&self, election_id: i64) -> Result<Vec<Position>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, election_id, name, description
            FROM positions
            WHERE election_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(election_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<Position, sqlx::Error> {
                Ok(Position {
                    id: row.try_get("id")?,
                    election_id: row.try_get("election_id")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                })
            })
            .collect()
    }

    pub async fn add_position(
        &self,
        election_id: i64,
        form: &PositionForm,
    ) -> Result<i64, StoreError> {
        let name = required("name", &form.name)?;
        if self.get_election(election_id).await?.is_none() {
            return Err(StoreError::NotFound(format!(
                "Election {} not found",
                election_id
            )));
        }

        let result =
            sqlx::query("INSERT INTO positions (election_id, name, description) VALUES (?, ?, ?)")
                .bind(election_id)
                .bind(&name)
                .bind(optional(form.description.as_deref()))
                .execute(&self.pool)
                .await?;

        Ok(result.last_insert_rowid())
    }
}
