use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::db as queries;
use crate::db::User;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Read a cookie value from the request headers.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// Current authenticated user (if any).
/// Use this extractor when authentication is optional.
///
/// Any failure while resolving the session is treated as "not signed in".
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);

        let Some(token) = cookie_value(&parts.headers, SESSION_COOKIE).filter(|t| !t.is_empty())
        else {
            return Ok(MaybeUser(None));
        };

        let session = match queries::get_session_by_token(&pool, token).await {
            Ok(Some(s)) => s,
            Ok(None) => return Ok(MaybeUser(None)),
            Err(e) => {
                tracing::warn!("Session lookup failed: {e:#}");
                return Ok(MaybeUser(None));
            }
        };

        let now = queries::format_timestamp(Utc::now());
        if session.expires_at < now {
            if let Err(e) = queries::delete_session(&pool, token).await {
                tracing::warn!("Failed to delete expired session: {e:#}");
            }
            return Ok(MaybeUser(None));
        }

        let user = match queries::get_user_by_id(&pool, session.user_id).await {
            Ok(Some(u)) => u,
            Ok(None) => return Ok(MaybeUser(None)),
            Err(e) => {
                tracing::warn!("User lookup failed: {e:#}");
                return Ok(MaybeUser(None));
            }
        };

        let _ = queries::update_session_last_used(&pool, session.id).await;

        Ok(MaybeUser(Some(user)))
    }
}

/// Current authenticated user (required).
/// Use this extractor when authentication is mandatory.
/// Anonymous requests are redirected to the sign-in page.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        match user {
            Some(u) => Ok(RequireUser(u)),
            None => Err(Redirect::to("/auth").into_response()),
        }
    }
}
