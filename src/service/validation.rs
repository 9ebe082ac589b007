//! Relational checks run before a write reaches the store: unique keys, referenced rows,
//! and delete restrictions. The store enforces the same rules; checking here first yields
//! the resource-specific messages.

use super::Resource;
use crate::error::{AppError, FieldErrors};
use crate::schema::Fields;
use crate::state::AppState;
use crate::store::{table_by_name, Filter, OnDelete, Record, ALL_TABLES};
use serde_json::Value;
use uuid::Uuid;

/// Every foreign key supplied in `fields` must name an existing row.
pub(crate) async fn check_references<R: Resource>(state: &AppState, fields: &Fields) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    for fk in R::TABLE.foreign_keys {
        let Some(Value::String(raw)) = fields.get(fk.column) else { continue };
        let Some(target) = table_by_name(fk.references) else { continue };
        let exists = match Uuid::parse_str(raw) {
            Ok(id) => state.store.fetch(target, id).await?.is_some(),
            Err(_) => false,
        };
        if !exists {
            errors
                .entry(R::SCHEMA.wire_name(fk.column).to_string())
                .or_default()
                .push(format!("Referenced {} does not exist.", target.singular));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// No other row may share any unique key with `record`. `own` is skipped (update).
pub(crate) async fn ensure_unique<R: Resource>(
    state: &AppState,
    record: &Record,
    own: Option<Uuid>,
) -> Result<(), AppError> {
    let own = own.map(|id| Value::String(id.to_string()));
    for key in R::TABLE.unique {
        let filter = Filter::Eq(
            key.iter()
                .map(|col| (*col, record.get(*col).cloned().unwrap_or(Value::Null)))
                .collect(),
        );
        let clash = state
            .store
            .fetch_where(R::TABLE, &filter)
            .await?
            .into_iter()
            .any(|row| own.is_none() || row.get("id") != own.as_ref());
        if clash {
            return Err(AppError::Conflict(R::CONFLICT.into()));
        }
    }
    Ok(())
}

/// Refuse to delete a row still referenced through a RESTRICT foreign key.
pub(crate) async fn ensure_unreferenced<R: Resource>(state: &AppState, id: Uuid) -> Result<(), AppError> {
    let key = id.to_string();
    for dependent in ALL_TABLES {
        for fk in dependent
            .foreign_keys
            .iter()
            .filter(|fk| fk.references == R::TABLE.name && fk.on_delete == OnDelete::Restrict)
        {
            let rows = state
                .store
                .fetch_where(dependent, &Filter::eq(fk.column, key.as_str()))
                .await?;
            if rows.iter().any(|row| row.get("id").and_then(Value::as_str) != Some(key.as_str())) {
                return Err(AppError::Conflict(format!(
                    "{} is still referenced by {}",
                    R::TABLE.singular,
                    dependent.name
                )));
            }
        }
    }
    Ok(())
}
