use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

pub(crate) const DEFAULT_PAGE: i64 = 1;
pub(crate) const DEFAULT_LIMIT: i64 = 25;

/// Pagination controls taken from the `page` and `limit` request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub page: i64,
    pub limit: i64,
}

impl Pageable {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn header_i64(parts: &Parts, name: &str) -> Result<Option<i64>, AppError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .map(Some)
        .ok_or_else(|| AppError::invalid_params(format!("{name} must be a positive integer")))
}

#[async_trait]
impl<S> FromRequestParts<S> for Pageable
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let page = header_i64(parts, "page")?.unwrap_or(DEFAULT_PAGE);
        let limit = header_i64(parts, "limit")?.unwrap_or(DEFAULT_LIMIT);
        Ok(Pageable { page, limit })
    }
}
