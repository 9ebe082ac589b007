//! Typed entities. Each maps 1:1 onto a table row; storage names are the serde names.

pub mod account;
pub mod credential;
pub mod organisation;
pub mod timestamp;
pub mod user;

pub use account::Account;
pub use credential::Credential;
pub use organisation::{Organisation, Role};
pub use user::User;

use crate::error::AppError;
use crate::schema::{Fields, Schema};
use crate::store::{Record, Table};
use chrono::{DateTime, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Current time at the precision PostgreSQL stores (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static Table;
    const SCHEMA: &'static Schema;

    fn id(&self) -> Uuid;

    /// Re-stamp the last-update timestamp.
    fn touch(&mut self, at: DateTime<Utc>);

    /// Restore entity invariants after fields were overlaid.
    fn normalise(&mut self) {}

    fn from_record(record: Record) -> Result<Self, AppError> {
        serde_json::from_value(Value::Object(record))
            .map_err(|e| AppError::Internal(format!("malformed {} row: {}", Self::TABLE.singular, e)))
    }

    fn to_record(&self) -> Result<Record, AppError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::Internal(format!("{} did not serialize to an object", Self::TABLE.singular))),
            Err(e) => Err(AppError::Internal(e.to_string())),
        }
    }

    /// Overlay validated fields, keeping everything not supplied, and re-stamp updated-at.
    fn merge(&self, fields: Fields) -> Result<Self, AppError> {
        let mut record = self.to_record()?;
        record.extend(fields);
        let mut merged = Self::from_record(record)?;
        merged.normalise();
        merged.touch(now());
        Ok(merged)
    }
}

/// Build a new entity from column defaults overlaid with validated input. The id is a
/// placeholder: the store assigns the real one at insert time.
pub(crate) fn assemble<E: Entity>(defaults: Value, fields: Fields) -> Result<E, AppError> {
    let at = Value::String(timestamp::format(&now()));
    let mut record = Record::new();
    record.insert("id".into(), Value::String(Uuid::nil().to_string()));
    record.insert("created_at".into(), at.clone());
    record.insert("updated_at".into(), at);
    if let Value::Object(defaults) = defaults {
        record.extend(defaults);
    }
    record.extend(fields);
    let mut entity = E::from_record(record)?;
    entity.normalise();
    Ok(entity)
}
