//! Session view returned by `GET /api/auth/session`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UserInfo;

/// Current session as seen by the client: who is signed in and until when.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: UserInfo,
    pub expires: DateTime<Utc>,
}
