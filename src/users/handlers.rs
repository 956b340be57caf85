use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::AppError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, UserFilter, UserListResponse},
        extractors::Pageable,
        repo_types::User,
        services::{hash_password, validate_new_user},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    validate_new_user(&payload)?;

    info!(email = %payload.email, "creating user");
    let hash = hash_password(payload.password.clone()).await?;
    let record = payload.into_record(hash);
    let user = User::create(&state.db, &record).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    pageable: Pageable,
    Query(filter): Query<UserFilter>,
) -> Result<Json<UserListResponse>, AppError> {
    let count = User::count(&state.db, &filter).await?;
    let users = User::list(&state.db, &filter, pageable.limit, pageable.offset()).await?;

    Ok(Json(UserListResponse { users, count }))
}

#[cfg(test)]
mod filter_query_tests {
    use super::*;
    use crate::users::repo_types::UserType;
    use axum::http::Uri;

    fn filter_from(uri: &str) -> Result<UserFilter, axum::extract::rejection::QueryRejection> {
        let uri: Uri = uri.parse().expect("uri parses");
        Query::<UserFilter>::try_from_uri(&uri).map(|Query(filter)| filter)
    }

    #[test]
    fn parses_allow_listed_params() {
        let filter = filter_from("/users?type=admin&country=AR").unwrap();
        assert_eq!(filter.user_type, Some(UserType::Admin));
        assert_eq!(filter.country.as_deref(), Some("AR"));
        assert_eq!(filter.email, None);
    }

    #[test]
    fn ignores_params_outside_the_allow_list() {
        let filter = filter_from("/users?id=7&password_hash=x&favorite_color=blue").unwrap();
        assert_eq!(filter.user_type, None);
        assert_eq!(filter.name, None);
        assert_eq!(filter.email, None);
    }

    #[test]
    fn rejects_ill_typed_values_for_known_params() {
        assert!(filter_from("/users?email_subscription=maybe").is_err());
        assert!(filter_from("/users?number_of_languages=many").is_err());
        assert!(filter_from("/users?type=superuser").is_err());
    }
}
