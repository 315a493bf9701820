//! First-boot reference data.
//!
//! Each table is seeded only when it is empty, so running the seeder again
//! leaves existing rows untouched.

use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use tracing::{error, info};

use super::repo::insert_election;
use crate::config::Config;
use crate::domain::{ElectionStatus, ElectionType, NewElection, Scope};

/// Schools as (name, code).
pub const DEFAULT_SCHOOLS: &[(&str, &str)] = &[
    ("School of Business", "SB"),
    ("School of Engineering", "SOE"),
    ("School of Information and Communication Technology", "SICT"),
    ("School of Mathematics and Natural Sciences", "SMNS"),
    ("School of Mines and Mineral Sciences", "SMMS"),
    ("School of the Built Environment", "SBE"),
    ("School of Natural Resources", "SNR"),
    ("School of Medicine", "SOM"),
];

/// Programs as (name, code, school code, duration in years).
pub const DEFAULT_PROGRAMS: &[(&str, &str, &str, i64)] = &[
    ("Bachelor of Accountancy", "BACC", "SB", 4),
    ("Bachelor of Business Administration", "BBA", "SB", 4),
    ("BEng Electrical Engineering", "BEEE", "SOE", 5),
    ("BEng Mechanical Engineering", "BEME", "SOE", 5),
    ("BSc Computer Science", "BSCS", "SICT", 4),
    ("BSc Information Technology", "BSIT", "SICT", 4),
    ("BSc Biological Sciences", "BIO", "SMNS", 4),
    ("BSc Mathematics", "BMATH", "SMNS", 4),
    ("BMin Mining Engineering", "BMIN", "SMMS", 5),
    ("Bachelor of Architecture", "BARCH", "SBE", 5),
    ("BSc Forestry", "BFOR", "SNR", 4),
    ("Bachelor of Medicine and Surgery", "MBCHB", "SOM", 7),
];

/// Academic years as (name, code).
pub const DEFAULT_ACADEMIC_YEARS: &[(&str, &str)] = &[
    ("First Year", "Y1"),
    ("Second Year", "Y2"),
    ("Third Year", "Y3"),
    ("Fourth Year", "Y4"),
    ("Fifth Year", "Y5"),
    ("Sixth Year", "Y6"),
    ("Seventh Year", "Y7"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
    pub sample_elections: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_email: "admin@cbu.ac.zm".to_string(),
            admin_password: "admin123".to_string(),
            sample_elections: true,
        }
    }
}

impl From<&Config> for SeedOptions {
    fn from(config: &Config) -> Self {
        Self {
            admin_username: config.admin_username.clone(),
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
            sample_elections: config.seed_sample_elections,
        }
    }
}

/// Rows inserted per table by one seeding run. Zero means the table already
/// had data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admins: usize,
    pub schools: usize,
    pub programs: usize,
    pub academic_years: usize,
    pub elections: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        *self == SeedReport::default()
    }
}

/// Seed every empty reference table inside one transaction.
///
/// # Errors
/// Any failure rolls back the whole run.
pub async fn seed_defaults(
    pool: &SqlitePool,
    options: &SeedOptions,
) -> Result<SeedReport, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();

    if table_is_empty(&mut *tx, "admin_users").await? {
        sqlx::query("INSERT INTO admin_users (username, email, password, role) VALUES (?, ?, ?, 'admin')")
            .bind(&options.admin_username)
            .bind(&options.admin_email)
            .bind(&options.admin_password)
            .execute(&mut *tx)
            .await?;
        report.admins = 1;
    }

    if table_is_empty(&mut *tx, "schools").await? {
        for (name, code) in DEFAULT_SCHOOLS {
            sqlx::query("INSERT INTO schools (name, code) VALUES (?, ?)")
                .bind(*name)
                .bind(*code)
                .execute(&mut *tx)
                .await?;
        }
        report.schools = DEFAULT_SCHOOLS.len();
    }

    if table_is_empty(&mut *tx, "programs").await? {
        for (name, code, school_code, years) in DEFAULT_PROGRAMS {
            sqlx::query(
                r#"
                INSERT INTO programs (name, code, school_id, duration_years)
                VALUES (?, ?, (SELECT id FROM schools WHERE code = ?), ?)
                "#,
            )
            .bind(*name)
            .bind(*code)
            .bind(*school_code)
            .bind(*years)
            .execute(&mut *tx)
            .await?;
        }
        report.programs = DEFAULT_PROGRAMS.len();
    }

    if table_is_empty(&mut *tx, "academic_years").await? {
        for (name, code) in DEFAULT_ACADEMIC_YEARS {
            sqlx::query("INSERT INTO academic_years (name, code) VALUES (?, ?)")
                .bind(*name)
                .bind(*code)
                .execute(&mut *tx)
                .await?;
        }
        report.academic_years = DEFAULT_ACADEMIC_YEARS.len();
    }

    if options.sample_elections && table_is_empty(&mut *tx, "elections").await? {
        let creator: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM admin_users ORDER BY id LIMIT 1")
                .fetch_optional(&mut *tx)
                .await?;
        let created_by = creator.map(|(id,)| id);

        let samples = sample_elections(&mut *tx, Utc::now().naive_utc()).await?;
        for election in &samples {
            insert_election(&mut *tx, election, created_by).await?;
        }
        report.elections = samples.len();
    }

    tx.commit().await?;
    Ok(report)
}

/// Seed at startup. Failures are logged and swallowed so the service still
/// starts; nothing is retried.
pub async fn ensure_seeded(pool: &SqlitePool, options: &SeedOptions) -> Option<SeedReport> {
    match seed_defaults(pool, options).await {
        Ok(report) if report.is_empty() => {
            info!("Reference data already present, nothing seeded");
            Some(report)
        }
        Ok(report) => {
            info!(
                admins = report.admins,
                schools = report.schools,
                programs = report.programs,
                academic_years = report.academic_years,
                elections = report.elections,
                "Seeded default data"
            );
            Some(report)
        }
        Err(e) => {
            error!(error = %e, "Seeding failed, transaction rolled back");
            None
        }
    }
}

async fn table_is_empty(conn: &mut SqliteConnection, table: &str) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count == 0)
}

/// Scope selecting the row of `table` with this code, or `All` if absent.
async fn scope_for_code(
    conn: &mut SqliteConnection,
    table: &str,
    code: &str,
) -> Result<Scope, sqlx::Error> {
    let id: Option<(i64,)> = sqlx::query_as(&format!("SELECT id FROM {} WHERE code = ?", table))
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(match id {
        Some((id,)) => Scope::Selected(vec![id.to_string()]),
        None => Scope::All,
    })
}

async fn sample_elections(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<Vec<NewElection>, sqlx::Error> {
    let opens = now
        .date()
        .and_hms_opt(8, 0, 0)
        .unwrap_or(now)
        + Duration::days(14);
    let closes = opens + Duration::hours(10);

    Ok(vec![
        NewElection {
            name: "Student Union General Elections".to_string(),
            description: Some("Election of the Student Union executive for the coming academic year.".to_string()),
            election_type: ElectionType::StudentUnion,
            school: Scope::All,
            program: Scope::All,
            academic_year: Scope::All,
            start_date: opens,
            end_date: closes,
            status: ElectionStatus::Upcoming,
        },
        NewElection {
            name: "SICT First Year Class Representatives".to_string(),
            description: Some("Class representatives for first-year ICT students.".to_string()),
            election_type: ElectionType::ClassRepresentative,
            school: scope_for_code(&mut *conn, "schools", "SICT").await?,
            program: Scope::All,
            academic_year: scope_for_code(&mut *conn, "academic_years", "Y1").await?,
            start_date: opens + Duration::days(7),
            end_date: closes + Duration::days(7),
            status: ElectionStatus::Draft,
        },
        NewElection {
            name: "Engineering Students Association".to_string(),
            description: Some("Executive committee of the Engineering Students Association.".to_string()),
            election_type: ElectionType::Association,
            school: scope_for_code(&mut *conn, "schools", "SOE").await?,
            program: Scope::All,
            academic_year: Scope::All,
            start_date: opens + Duration::days(21),
            end_date: closes + Duration::days(21),
            status: ElectionStatus::Draft,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    async fn temp_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        (init_db(&db_path).await.expect("init_db failed"), temp_dir)
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn test_first_run_seeds_everything() {
        let (pool, _temp) = temp_pool().await;
        let report = seed_defaults(&pool, &SeedOptions::default()).await.unwrap();

        assert_eq!(report.admins, 1);
        assert_eq!(report.schools, DEFAULT_SCHOOLS.len());
        assert_eq!(report.programs, DEFAULT_PROGRAMS.len());
        assert_eq!(report.academic_years, DEFAULT_ACADEMIC_YEARS.len());
        assert_eq!(report.elections, 3);

        // 3 Student Union + 2 Class Representative + 0 Association
        assert_eq!(count(&pool, "positions").await, 5);

        let (orphans,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM programs WHERE school_id IS NULL")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_second_run_changes_nothing() {
        let (pool, _temp) = temp_pool().await;
        seed_defaults(&pool, &SeedOptions::default()).await.unwrap();

        let tables = [
            "admin_users",
            "schools",
            "programs",
            "academic_years",
            "elections",
            "positions",
        ];
        let mut before = Vec::new();
        for table in tables {
            before.push(count(&pool, table).await);
        }

        let report = seed_defaults(&pool, &SeedOptions::default()).await.unwrap();
        assert!(report.is_empty());

        for (table, expected) in tables.iter().zip(before) {
            assert_eq!(count(&pool, table).await, expected, "{} changed", table);
        }
    }

    #[tokio::test]
    async fn test_sample_elections_optional() {
        let (pool, _temp) = temp_pool().await;
        let options = SeedOptions {
            sample_elections: false,
            ..SeedOptions::default()
        };
        let report = seed_defaults(&pool, &options).await.unwrap();
        assert_eq!(report.elections, 0);
        assert_eq!(count(&pool, "elections").await, 0);
    }

    #[tokio::test]
    async fn test_ensure_seeded_swallows_failure() {
        let (pool, _temp) = temp_pool().await;
        pool.close().await;
        assert!(ensure_seeded(&pool, &SeedOptions::default()).await.is_none());
    }
}
