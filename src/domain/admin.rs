//! Administrator accounts.

use serde::Serialize;

use super::enums::AdminRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored and compared in plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: AdminRole,
    pub is_active: bool,
}
