//! Reference-table readers used to populate forms.
//!
//! These never return an error: a failed query is logged and reported as an
//! empty list, so callers cannot tell "no rows" from "store unavailable".

use sqlx::Row;
use tracing::warn;

use super::Repository;
use crate::domain::{AcademicYear, Program, School};

impl Repository {
    /// Active schools ordered by name.
    pub async fn fetch_schools(&self) -> Vec<School> {
        self.try_fetch_schools().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch schools");
            Vec::new()
        })
    }

    /// Active programs, optionally limited to one school, ordered by
    /// (school name, program name).
    pub async fn fetch_programs(&self, school_id: Option<i64>) -> Vec<Program> {
        self.try_fetch_programs(school_id)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, school_id = ?school_id, "Failed to fetch programs");
                Vec::new()
            })
    }

    /// Active academic years ordered by code.
    pub async fn fetch_academic_years(&self) -> Vec<AcademicYear> {
        self.try_fetch_academic_years().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch academic years");
            Vec::new()
        })
    }

    async fn try_fetch_schools(&self) -> Result<Vec<School>, sqlx::Error> {
        let rows =
            sqlx::query("SELECT id, name, code FROM schools WHERE is_active = 1 ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        rows.iter()
            .map(|row| -> Result<School, sqlx::Error> {
                Ok(School {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    code: row.try_get("code")?,
                })
            })
            .collect()
    }

    async fn try_fetch_programs(&self, school_id: Option<i64>) -> Result<Vec<Program>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.code, p.school_id, p.duration_years, s.name AS school_name
            FROM programs p
            LEFT JOIN schools s ON s.id = p.school_id
            WHERE p.is_active = 1 AND (? IS NULL OR p.school_id = ?)
            ORDER BY s.name, p.name
            "#,
        )
        .bind(school_id)
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<Program, sqlx::Error> {
                Ok(Program {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    code: row.try_get("code")?,
                    school_id: row.try_get("school_id")?,
                    school_name: row.try_get("school_name")?,
                    duration_years: row.try_get("duration_years")?,
                })
            })
            .collect()
    }

    async fn try_fetch_academic_years(&self) -> Result<Vec<AcademicYear>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, name, code FROM academic_years WHERE is_active = 1 ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<AcademicYear, sqlx::Error> {
                Ok(AcademicYear {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    code: row.try_get("code")?,
                })
            })
            .collect()
    }
}
