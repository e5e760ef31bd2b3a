//! Bearer token extractor for session lookups.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use std::convert::Infallible;
use tracing::debug;

use crate::auth::Claims;
use crate::handlers::http::AppState;

/// Claims of the bearer token, if the request carries a valid one.
///
/// Never rejects: a missing, malformed, expired or forged token is `None`.
#[derive(Clone, Debug)]
pub struct SessionUser(pub Option<Claims>);

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(TypedHeader(Authorization(bearer))) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
        else {
            return Ok(SessionUser(None));
        };

        match state.jwt_secret().validate(bearer.token()) {
            Ok(claims) => Ok(SessionUser(Some(claims))),
            Err(e) => {
                debug!(error = %e, "ignoring bearer token");
                Ok(SessionUser(None))
            }
        }
    }
}
