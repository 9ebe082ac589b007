use super::{assemble, timestamp, Entity};
use crate::error::AppError;
use crate::schema::{Fields, Schema, ACCOUNT};
use crate::store::{Table, ACCOUNTS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const DEFAULT_ACCOUNT_NAME: &str = "Default Account";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub organisation_id: Uuid,
}

impl Account {
    pub fn open(fields: Fields) -> Result<Self, AppError> {
        assemble(json!({ "name": DEFAULT_ACCOUNT_NAME }), fields)
    }
}

impl Entity for Account {
    const TABLE: &'static Table = &ACCOUNTS;
    const SCHEMA: &'static Schema = &ACCOUNT;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
