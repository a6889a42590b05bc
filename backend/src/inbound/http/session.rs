//! Session-token extraction and identity resolution.
//!
//! The token travels either as `Authorization: Bearer <token>` or in the
//! `session_token` cookie; the header wins when both are present. The
//! extractor only carries the token — resolving it against the session
//! store happens in the handler, where the state is available.

use std::future::{ready, Ready};

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::domain::{Error, SessionIdentity, SessionToken, UserId, SESSION_TTL};
use crate::inbound::http::state::HttpState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

/// Session token taken from the request, if any was carried.
///
/// A malformed token is treated the same as an absent one; the
/// authorization decision happens against the store, not the syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthToken(pub Option<SessionToken>);

impl AuthToken {
    fn from_http_request(req: &HttpRequest) -> Self {
        let bearer = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(SessionToken::parse);
        if bearer.is_some() {
            return Self(bearer);
        }

        let cookie = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| SessionToken::parse(cookie.value()));
        Self(cookie)
    }
}

impl FromRequest for AuthToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_http_request(req)))
    }
}

/// Resolve the carried token to an identity, or answer 401.
pub async fn require_identity(
    state: &HttpState,
    token: AuthToken,
) -> Result<(SessionToken, SessionIdentity), Error> {
    let unauthorized = || Error::unauthorized("login required");
    let token = token.0.ok_or_else(unauthorized)?;
    let identity = state.sessions.get(&token).await.map_err(|err| {
        tracing::error!(error = %err, "session lookup failed");
        Error::internal("unable to verify session")
    })?;
    identity
        .map(|identity| (token, identity))
        .ok_or_else(unauthorized)
}

/// Resolve the carried token to an identity when one exists.
///
/// Store failures are logged and read as "no session": this path only gates
/// conveniences such as the already-signed-in redirect.
pub async fn identity_if_any(state: &HttpState, token: AuthToken) -> Option<SessionIdentity> {
    let token = token.0?;
    match state.sessions.get(&token).await {
        Ok(identity) => identity,
        Err(err) => {
            tracing::error!(error = %err, "session lookup failed");
            None
        }
    }
}

/// Acting user id for an authenticated request.
pub fn acting_user(identity: &SessionIdentity) -> UserId {
    UserId::from_uuid(identity.user_id)
}

/// Session cookie for a freshly created token.
pub fn session_cookie(token: SessionToken) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(
            i64::try_from(SESSION_TTL.as_secs()).unwrap_or(i64::MAX),
        ))
        .finish()
}

/// Expired cookie clearing the session token on sign-out.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}
