//! Administrator accounts.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;
use crate::db::error::decode_error;
use crate::domain::AdminUser;

fn admin_from_row(row: &SqliteRow) -> Result<AdminUser, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(AdminUser {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
        role: role.parse().map_err(decode_error)?,
        is_active: row.try_get("is_active")?,
    })
}

impl Repository {
    pub async fn find_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, username, email, password, role, is_active FROM admin_users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(admin_from_row).transpose()
    }

    /// Active admin whose stored password equals `password` exactly.
    pub async fn authenticate_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let admin = self.find_admin_by_username(username.trim()).await?;
        Ok(admin.filter(|a| a.is_active && a.password == password))
    }
}
