//! Authentication handlers: the JSON API under `/api/v1/auth` and the
//! `/login` / `/register` form endpoints.

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::forms::{Form, LoginForm, RegisterForm};
use crate::domain::{Credentials, Error, ErrorCode, Message, MessageKey, SessionIdentity};
use crate::inbound::http::forms::{FormEnvelope, FormPairs};
use crate::inbound::http::hypermedia::redirect;
use crate::inbound::http::session::{
    identity_if_any, removal_cookie, require_identity, session_cookie, AuthToken,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Sign-in request body for `POST /api/v1/auth/sign-in`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body for `POST /api/v1/auth/register-account`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Token payload answered by sign-in and registration.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    /// Opaque session token; also set as the `session_token` cookie.
    pub token: String,
}

fn add_cookie(
    response: &mut HttpResponse,
    cookie: &actix_web::cookie::Cookie<'_>,
) -> Result<(), Error> {
    response.add_cookie(cookie).map_err(|err| {
        tracing::error!(error = %err, "failed to attach session cookie");
        Error::internal("unable to sign in")
    })
}

async fn open_session(
    state: &HttpState,
    identity: &SessionIdentity,
) -> Result<(String, actix_web::cookie::Cookie<'static>), Error> {
    let token = state.sessions.create(identity).await.map_err(|err| {
        tracing::error!(error = %err, "session creation failed");
        Error::internal("unable to sign in")
    })?;
    Ok((token.to_string(), session_cookie(token)))
}

/// Authenticate credentials and mint a session token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse,
         headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    payload: web::Json<SignInRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let identity = state.accounts.sign_in(&credentials).await?;
    let (token, cookie) = open_session(&state, &identity).await?;
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(SessionResponse { token }))
}

/// Drop the current session and clear the cookie.
#[utoipa::path(
    get,
    path = "/api/v1/auth/sign-out",
    responses(
        (status = 200, description = "Signed out; cookie cleared"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signOut"
)]
#[get("/sign-out")]
pub async fn sign_out(state: web::Data<HttpState>, token: AuthToken) -> ApiResult<HttpResponse> {
    if let Some(token) = token.0 {
        // Best effort: an already-gone session still signs out.
        if let Err(err) = state.sessions.delete(&token).await {
            tracing::error!(error = %err, "session deletion failed");
        }
    }
    Ok(HttpResponse::Ok().cookie(removal_cookie()).finish())
}

/// Register an account and mint a session token for it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register-account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse,
         headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Validation failed", body = Error),
        (status = 409, description = "Account already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "registerAccount",
    security([])
)]
#[post("/register-account")]
pub async fn register_account(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let mut form = RegisterForm::from_pairs(&[
        ("email".to_owned(), payload.email.clone()),
        ("username".to_owned(), payload.username.clone()),
        ("password".to_owned(), payload.password.clone()),
        ("password_2".to_owned(), payload.password.clone()),
    ]);
    let (valid, messages) = form.is_valid();
    if !valid {
        return Err(Error::invalid_request("validation failed")
            .with_details(serde_json::json!({ "messages": messages })));
    }

    let identity = state
        .accounts
        .register(&payload.email, &payload.username, &payload.password)
        .await?;
    let (token, cookie) = open_session(&state, &identity).await?;
    Ok(HttpResponse::Created()
        .cookie(cookie)
        .json(SessionResponse { token }))
}

/// `GET /login`: pristine form state, or a redirect home when already
/// signed in.
#[get("/login")]
pub async fn login_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
) -> ApiResult<HttpResponse> {
    if identity_if_any(&state, token).await.is_some() {
        return Ok(redirect(&req, "/"));
    }
    Ok(FormEnvelope::pristine(LoginForm::pristine().view()).into_response())
}

/// `POST /login`: validate, verify credentials, open a session.
#[post("/login")]
pub async fn login_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    pairs: FormPairs,
) -> ApiResult<HttpResponse> {
    if identity_if_any(&state, token).await.is_some() {
        return Ok(redirect(&req, "/"));
    }

    let mut form = LoginForm::from_pairs(pairs.as_slice());
    let (valid, messages) = form.is_valid();
    if !valid {
        return Ok(FormEnvelope::new(form.view(), messages, form.state()).into_response());
    }

    let credentials = Credentials::try_from_parts(&form.email, &form.password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    match state.accounts.sign_in(&credentials).await {
        Ok(identity) => {
            let (_, cookie) = open_session(&state, &identity).await?;
            let mut response = redirect(&req, "/");
            add_cookie(&mut response, &cookie)?;
            Ok(response)
        }
        Err(err) if err.code() == ErrorCode::Unauthorized => Ok(FormEnvelope::new(
            form.view(),
            vec![Message::new(MessageKey::InvalidCredentials)],
            form.state(),
        )
        .into_response()),
        Err(err) => Err(err),
    }
}

/// `GET /register`: pristine form state, or a redirect home when already
/// signed in.
#[get("/register")]
pub async fn register_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
) -> ApiResult<HttpResponse> {
    if identity_if_any(&state, token).await.is_some() {
        return Ok(redirect(&req, "/"));
    }
    Ok(FormEnvelope::pristine(RegisterForm::pristine().view()).into_response())
}

/// `POST /register`: validate, create the account, open a session.
#[post("/register")]
pub async fn register_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    pairs: FormPairs,
) -> ApiResult<HttpResponse> {
    if identity_if_any(&state, token).await.is_some() {
        return Ok(redirect(&req, "/"));
    }

    let mut form = RegisterForm::from_pairs(pairs.as_slice());
    let (valid, messages) = form.is_valid();
    if !valid {
        return Ok(FormEnvelope::new(form.view(), messages, form.state()).into_response());
    }

    match state
        .accounts
        .register(&form.login.email, &form.username, &form.login.password)
        .await
    {
        Ok(identity) => {
            let (_, cookie) = open_session(&state, &identity).await?;
            let mut response = redirect(&req, "/");
            add_cookie(&mut response, &cookie)?;
            Ok(response)
        }
        Err(err) if err.code() == ErrorCode::Conflict => Ok(FormEnvelope::new(
            form.view(),
            vec![Message::new(MessageKey::AccountAlreadyExists)],
            form.state(),
        )
        .into_response()),
        Err(err) => Err(err),
    }
}

/// Placeholder for the `/` page the redirects land on.
///
/// The real page is rendered by the front-end layer; the backend only needs
/// the route to exist so redirect targets resolve.
#[get("/")]
pub async fn home(state: web::Data<HttpState>, token: AuthToken) -> ApiResult<HttpResponse> {
    let (_, identity) = require_identity(&state, token).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "username": identity.username })))
}
