//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `voters.rs` - Registration, lookup, login and listing of students
//! - `admins.rs` - Administrator login
//! - `elections.rs` - Election lifecycle, positions and the filtered listing
//! - `candidates.rs` - Nominations, approval and the filtered listing
//! - `votes.rs` - Ballot recording
//! - `lookups.rs` - Reference-table readers that never fail
//! - `reports.rs` - Dashboard and per-election aggregates

mod admins;
mod candidates;
mod elections;
mod lookups;
mod reports;
mod voters;
mod votes;

pub(crate) use elections::insert_election;

use sqlx::sqlite::SqlitePool;

/// Repository for database operations.
///
/// Cloning is cheap; clones share the same pool. Every method borrows a
/// pooled connection (or opens a transaction) for its own duration only.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Repository;
    use crate::db::migrations::init_db;
    use crate::domain::{ElectionForm, ElectionType, NewElection, RegistrationForm};
    use tempfile::TempDir;

    pub async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    pub fn registration(student_number: &str, first: &str, last: &str) -> RegistrationForm {
        RegistrationForm {
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: "2002-04-11".to_string(),
            school_id: None,
            program: "BSc Computer Science".to_string(),
            academic_year: "Y2".to_string(),
            student_number: student_number.to_string(),
            nrc_number: format!("NRC-{}", student_number),
            gender: "Male".to_string(),
            email: format!("{}@students.example.com", student_number),
            phone: "0977000000".to_string(),
            address_type: "Campus".to_string(),
        }
    }

    pub fn election(name: &str, election_type: ElectionType, status: &str) -> NewElection {
        ElectionForm {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            election_type: election_type.as_str().to_string(),
            start_date: "2025-05-01T08:00".to_string(),
            end_date: "2025-05-02T17:00".to_string(),
            status: Some(status.to_string()),
            ..Default::default()
        }
        .validate()
        .expect("valid election")
    }
}
