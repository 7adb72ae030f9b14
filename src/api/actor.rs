//! Extractors for the acting user.

use super::AppState;
use crate::errors::Error;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// The username supplied by the upstream auth gate, if any.
///
/// Never rejects: stock mutations without an identity are recorded as
/// [`crate::core::audit::UNKNOWN_ACTOR`].
#[derive(Debug, Clone, Default)]
pub struct Actor(pub Option<String>);

impl Actor {
    /// The username, if one was supplied.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(&state.actor_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string);
        Ok(Self(username))
    }
}

/// An actor listed in the admin configuration. Rejects with 401 when no
/// identity was supplied and 403 when the user is not an admin.
#[derive(Debug, Clone)]
pub struct Admin(pub String);

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Actor(username) = Actor::from_request_parts(parts, state)
            .await
            .unwrap_or_default();
        let username = username.ok_or(Error::Unauthorized)?;

        if state.admins.contains(&username) {
            Ok(Self(username))
        } else {
            tracing::warn!(%username, "non-admin attempted to access the audit log");
            Err(Error::Forbidden { username })
        }
    }
}
