//! Ballot recording.

use sqlx::Row;
use tracing::info;

use super::Repository;
use crate::db::error::StoreError;

impl Repository {
    /// Record one vote and flag the voter as having voted.
    ///
    /// Both writes share a transaction. Nothing here stops a voter from
    /// voting twice in the same election; the schema carries no such
    /// constraint.
    pub async fn record_vote(
        &self,
        election_id: i64,
        voter_id: i64,
        candidate_id: i64,
        ip_address: Option<&str>,
    ) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let candidate_election = sqlx::query("SELECT election_id FROM candidates WHERE id = ?")
            .bind(candidate_id)
            .fetch_optional(&mut *tx)
            .await?
            .map(|row| row.try_get::<i64, _>("election_id"))
            .transpose()?;
        if candidate_election != Some(election_id) {
            return Err(StoreError::NotFound(format!(
                "Candidate {} is not standing in election {}",
                candidate_id, election_id
            )));
        }

        let flagged = sqlx::query("UPDATE voters SET has_voted = 1 WHERE id = ?")
            .bind(voter_id)
            .execute(&mut *tx)
            .await?;
        if flagged.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Voter {} not found", voter_id)));
        }

        let result = sqlx::query(
            "INSERT INTO votes (election_id, voter_id, candidate_id, ip_address) VALUES (?, ?, ?, ?)",
        )
        .bind(election_id)
        .bind(voter_id)
        .bind(candidate_id)
        .bind(ip_address)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let vote_id = result.last_insert_rowid();
        info!(vote_id, election_id, voter_id, candidate_id, "Vote recorded");
        Ok(vote_id)
    }
}
