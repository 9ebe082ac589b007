use super::{assemble, now, timestamp, Entity};
use crate::error::AppError;
use crate::schema::{Fields, Schema, CREDENTIAL};
use crate::store::{Table, CREDENTIALS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    /// bcrypt hash, never the plaintext.
    pub password: String,
    #[serde(with = "timestamp::option")]
    pub password_set_at: Option<DateTime<Utc>>,
    pub is_locked: bool,
    pub is_expired: bool,
    #[serde(with = "timestamp::option")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::option")]
    pub last_logout_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::option")]
    pub user_info_last_login_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::option")]
    pub user_info_last_login_failed_at: Option<DateTime<Utc>>,
    pub user_info_last_login_failed_count: Option<i32>,
}

/// Swap the plaintext `password` in `fields` for `hash` and stamp `password_set_at`.
pub fn replace_password(fields: &mut Fields, hash: String) {
    fields.insert("password".into(), Value::String(hash));
    fields.insert("password_set_at".into(), Value::String(timestamp::format(&now())));
}

impl Credential {
    /// `fields` must already carry the hashed password.
    pub fn issue(fields: Fields) -> Result<Self, AppError> {
        assemble(
            json!({
                "is_locked": false,
                "is_expired": false,
                "last_login_at": null,
                "last_logout_at": null,
                "user_info_last_login_at": null,
                "user_info_last_login_failed_at": null,
                "user_info_last_login_failed_count": null,
            }),
            fields,
        )
    }
}

impl Entity for Credential {
    const TABLE: &'static Table = &CREDENTIALS;
    const SCHEMA: &'static Schema = &CREDENTIAL;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
