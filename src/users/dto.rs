use serde::{Deserialize, Serialize};
use time::Date;

use crate::users::repo_types::{NewUser, User, UserType};

/// Request body for user creation. Field names are snake_case on the wire.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type", default)]
    pub user_type: UserType,
    pub birth_date: Option<Date>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub email_subscription: Option<bool>,
    pub number_of_languages: Option<i32>,
}

impl CreateUserRequest {
    /// Swap the plaintext password for its hash; every other field passes
    /// through unchanged.
    pub fn into_record(self, password_hash: String) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            password_hash,
            user_type: self.user_type,
            birth_date: self.birth_date,
            country: self.country,
            state: self.state,
            city: self.city,
            address: self.address,
            email_subscription: self.email_subscription,
            number_of_languages: self.number_of_languages,
        }
    }
}

/// Exact-match listing filters. Only the fields named here are filterable;
/// anything else in the query string is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub email_subscription: Option<bool>,
    pub number_of_languages: Option<i32>,
}

/// Pagination envelope returned by `GET /users`.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub count: i64,
}
