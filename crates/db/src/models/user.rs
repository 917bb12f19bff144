//! User entity model and DTOs.

use cometa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// The PIN hash and login-lockout bookkeeping are deliberately excluded from
/// serialization; they never leave the server.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lang_pref: String,
    pub role: String,
    pub is_active: bool,
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing)]
    pub pin_hash: String,
    #[serde(skip_serializing)]
    pub failed_login_count: i32,
    #[serde(skip_serializing)]
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new user. `pin_hash` is the Argon2id PHC string,
/// never the plaintext PIN.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lang_pref: String,
    pub role: String,
    pub skills: Option<Vec<String>>,
    pub pin_hash: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lang_pref: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub skills: Option<Vec<String>>,
}

/// Filter parameters for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    /// Case-insensitive match against first name, last name, or email.
    pub search: Option<String>,
}
