use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Kind of user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Regular,
    Admin,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub user_type: UserType,
    pub birth_date: Option<Date>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub email_subscription: Option<bool>,
    pub number_of_languages: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Persistence-ready record: the creation payload with the plaintext
/// password already replaced by its hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub birth_date: Option<Date>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub email_subscription: Option<bool>,
    pub number_of_languages: Option<i32>,
}
