//! Auth HTTP handlers: login, register, session, sign-out, provider sign-in.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Redirect,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::CallbackQuery;
use crate::error::{AppError, AppResult, LoginError};
use crate::handlers::http::AppState;
use crate::middleware::SessionUser;
use crate::models::{Session, UserInfo};

/// Credential pair. Only a missing or mistyped field is malformed; empty
/// strings go through verification like any other value.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub url: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, LoginError> {
    let Json(body) = payload?;

    let token = state
        .verifier()
        .login(&body.email, &body.password)
        .await
        .map_err(|e| LoginError::from_app(e, state.login_error_detail()))?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
    }))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let user = state.verifier().register(&body).await?;
    let token = state.jwt_secret().issue(user.id)?;

    Ok(Json(RegisterResponse {
        id: user.id,
        email: user.email,
        token,
    }))
}

/// GET /api/auth/session: `null` unless a valid bearer token names an existing user.
pub async fn session(
    State(state): State<AppState>,
    SessionUser(claims): SessionUser,
) -> AppResult<Json<Option<Session>>> {
    let Some(claims) = claims else {
        return Ok(Json(None));
    };
    let Some(user) = state.users().find_by_id(claims.user_id).await? else {
        return Ok(Json(None));
    };
    let expires = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AppError::Jwt("expiry out of range".to_string()))?;

    Ok(Json(Some(Session {
        user: UserInfo::from(&user),
        expires,
    })))
}

/// POST /api/auth/signout. Tokens are stateless; the client drops its copy
/// and navigates to the returned url.
pub async fn sign_out(
    SessionUser(claims): SessionUser,
    Query(query): Query<CallbackQuery>,
) -> Json<SignOutResponse> {
    if let Some(claims) = claims {
        info!(user_id = %claims.user_id, "signed out");
    }
    Json(SignOutResponse {
        url: query.callback().to_string(),
    })
}

/// GET /api/auth/signin/:provider: redirect to the provider's consent page.
pub async fn provider_sign_in(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Redirect> {
    let url = state
        .providers()
        .authorization_url(&provider, &query.callback(), state.state_signer())?;
    info!(provider = %provider, "redirecting to identity provider");
    Ok(Redirect::to(url.as_str()))
}
