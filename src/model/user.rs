use super::{assemble, now, timestamp, Entity};
use crate::error::AppError;
use crate::schema::{Fields, Schema, USER};
use crate::store::{Table, USERS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const DEFAULT_LANGUAGE: &str = "en_US";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub username: String,
    pub email_address: String,
    pub first_name: Option<String>,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub preferred_language: String,
    #[serde(with = "timestamp::option")]
    pub registered_at: Option<DateTime<Utc>>,
    /// 32 hex characters; never encoded on the wire.
    pub confirmation_code: Option<String>,
    pub is_confirmed: bool,
    pub organisation_id: Uuid,
}

impl User {
    /// A freshly registered, unconfirmed user.
    pub fn register(fields: Fields) -> Result<Self, AppError> {
        assemble(
            json!({
                "preferred_language": DEFAULT_LANGUAGE,
                "registered_at": timestamp::format(&now()),
                "confirmation_code": Uuid::new_v4().simple().to_string(),
                "is_confirmed": false,
            }),
            fields,
        )
    }
}

impl Entity for User {
    const TABLE: &'static Table = &USERS;
    const SCHEMA: &'static Schema = &USER;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
