//! Dashboard and per-election aggregates.

use std::collections::HashMap;

use sqlx::Row;

use super::Repository;
use crate::domain::stats::percentage;
use crate::domain::{CandidateTally, DashboardStats, ElectionFilter, ElectionStatus, StatusCount};

const RECENT_ELECTIONS: i64 = 5;

impl Repository {
    /// Totals for the admin dashboard.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, sqlx::Error> {
        let totals = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM voters) AS total_voters,
                (SELECT COUNT(*) FROM voters WHERE has_voted = 1) AS voters_voted,
                (SELECT COUNT(*) FROM elections) AS total_elections,
                (SELECT COUNT(*) FROM elections WHERE status = 'active') AS active_elections,
                (SELECT COUNT(*) FROM candidates) AS total_candidates,
                (SELECT COUNT(*) FROM candidates WHERE is_approved = 1) AS approved_candidates,
                (SELECT COUNT(*) FROM votes) AS total_votes
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let status_rows =
            sqlx::query("SELECT status, COUNT(*) AS count FROM elections GROUP BY status")
                .fetch_all(&self.pool)
                .await?;
        let mut by_status: HashMap<String, i64> = HashMap::new();
        for row in &status_rows {
            by_status.insert(row.try_get("status")?, row.try_get("count")?);
        }
        let elections_by_status = ElectionStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: by_status.get(status.as_str()).copied().unwrap_or(0),
            })
            .collect();

        let recent_elections = self
            .list_elections(&ElectionFilter {
                limit: Some(RECENT_ELECTIONS),
                ..Default::default()
            })
            .await?;

        let total_voters: i64 = totals.try_get("total_voters")?;
        let voters_voted: i64 = totals.try_get("voters_voted")?;

        Ok(DashboardStats {
            total_voters,
            voters_voted,
            turnout_percent: percentage(voters_voted, total_voters),
            total_elections: totals.try_get("total_elections")?,
            active_elections: totals.try_get("active_elections")?,
            total_candidates: totals.try_get("total_candidates")?,
            approved_candidates: totals.try_get("approved_candidates")?,
            total_votes: totals.try_get("total_votes")?,
            elections_by_status,
            recent_elections,
        })
    }

    /// Vote totals per candidate, grouped by position, leaders first.
    pub async fn election_results(
        &self,
        election_id: i64,
    ) -> Result<Vec<CandidateTally>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT c.id AS candidate_id, c.student_number, c.position, c.is_approved,
                   v.first_name, v.last_name, COUNT(vo.id) AS votes
            FROM candidates c
            LEFT JOIN voters v ON v.student_number = c.student_number
            LEFT JOIN votes vo ON vo.candidate_id = c.id
            WHERE c.election_id = ?
            GROUP BY c.id
            ORDER BY c.position ASC, votes DESC, c.id ASC
            "#,
        )
        .bind(election_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<CandidateTally, sqlx::Error> {
                Ok(CandidateTally {
                    candidate_id: row.try_get("candidate_id")?,
                    student_number: row.try_get("student_number")?,
                    first_name: row.try_get("first_name")?,
                    last_name: row.try_get("last_name")?,
                    position: row.try_get("position")?,
                    is_approved: row.try_get("is_approved")?,
                    votes: row.try_get("votes")?,
                })
            })
            .collect()
    }
}
