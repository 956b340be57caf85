use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};

use crate::error::AppError;
use crate::users::dto::UserFilter;
use crate::users::repo_types::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, \"type\", birth_date, country, \
     state, city, address, email_subscription, number_of_languages, created_at, updated_at";

impl User {
    /// Persist a new user. Uniqueness lives in the unique index on email;
    /// any rejection by the store surfaces as invalid parameters.
    pub async fn create(db: &PgPool, record: &NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (name, email, password_hash, "type", birth_date, country,
                 state, city, address, email_subscription, number_of_languages)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, email, password_hash, "type", birth_date, country,
                      state, city, address, email_subscription, number_of_languages,
                      created_at, updated_at
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.user_type)
        .bind(record.birth_date)
        .bind(&record.country)
        .bind(&record.state)
        .bind(&record.city)
        .bind(&record.address)
        .bind(record.email_subscription)
        .bind(record.number_of_languages)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, email = %record.email, "create user failed");
            if is_unique_violation(&e) {
                AppError::invalid_params("The email provided is already in use")
            } else {
                AppError::invalid_params(e.to_string())
            }
        })?;

        info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Windowed listing over the allow-listed filters, oldest first.
    pub async fn list(
        db: &PgPool,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filter(&mut query, filter);
        query.push(" ORDER BY id ASC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        query
            .build_query_as::<User>()
            .fetch_all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "list users failed");
                AppError::Database(e)
            })
    }

    /// Total rows matching the filter, for the pagination envelope.
    pub async fn count(db: &PgPool, filter: &UserFilter) -> Result<i64, AppError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filter(&mut query, filter);

        query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "count users failed");
                AppError::Database(e)
            })
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.constraint())
        .map(|c| c.contains("users_email"))
        == Some(true)
}

fn push_condition(query: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    query.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let mut first = true;
    if let Some(user_type) = filter.user_type {
        push_condition(query, &mut first);
        query.push("\"type\" = ").push_bind(user_type);
    }
    for (column, value) in [
        ("name", &filter.name),
        ("email", &filter.email),
        ("country", &filter.country),
        ("state", &filter.state),
        ("city", &filter.city),
        ("address", &filter.address),
    ] {
        if let Some(value) = value {
            push_condition(query, &mut first);
            query.push(column).push(" = ").push_bind(value.clone());
        }
    }
    if let Some(subscribed) = filter.email_subscription {
        push_condition(query, &mut first);
        query.push("email_subscription = ").push_bind(subscribed);
    }
    if let Some(languages) = filter.number_of_languages {
        push_condition(query, &mut first);
        query.push("number_of_languages = ").push_bind(languages);
    }
}

#[cfg(test)]
mod filter_tests {
    use super::*;
    use crate::users::repo_types::UserType;

    fn sql_for(filter: &UserFilter) -> String {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filter(&mut query, filter);
        query.sql().to_string()
    }

    #[test]
    fn empty_filter_adds_no_where_clause() {
        assert_eq!(sql_for(&UserFilter::default()), "SELECT COUNT(*) FROM users");
    }

    #[test]
    fn single_filter_binds_one_placeholder() {
        let filter = UserFilter {
            user_type: Some(UserType::Admin),
            ..Default::default()
        };
        assert_eq!(
            sql_for(&filter),
            "SELECT COUNT(*) FROM users WHERE \"type\" = $1"
        );
    }

    #[test]
    fn filters_combine_with_and() {
        let filter = UserFilter {
            user_type: Some(UserType::Regular),
            country: Some("AR".into()),
            email_subscription: Some(true),
            number_of_languages: Some(2),
            ..Default::default()
        };
        assert_eq!(
            sql_for(&filter),
            "SELECT COUNT(*) FROM users WHERE \"type\" = $1 AND country = $2 \
             AND email_subscription = $3 AND number_of_languages = $4"
        );
    }

    #[test]
    fn text_filters_use_declaration_order() {
        let filter = UserFilter {
            name: Some("Ada".into()),
            city: Some("Buenos Aires".into()),
            ..Default::default()
        };
        assert_eq!(
            sql_for(&filter),
            "SELECT COUNT(*) FROM users WHERE name = $1 AND city = $2"
        );
    }
}
