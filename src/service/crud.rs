//! Generic CRUD execution against the entity store.

use super::validation::{check_references, ensure_unique, ensure_unreferenced};
use super::Resource;
use crate::error::AppError;
use crate::schema::{Embedded, Fields, Mode, View};
use crate::state::AppState;
use crate::store::{Filter, Record};
use serde_json::Value;
use uuid::Uuid;

pub struct CrudService;

impl CrudService {
    /// Rows matching `filter`, ordered by id, in list view (no nested relations).
    pub async fn list<R: Resource>(state: &AppState, filter: &Filter) -> Result<Vec<Fields>, AppError> {
        let rows = state.store.fetch_where(R::TABLE, filter).await?;
        Ok(rows
            .iter()
            .map(|row| R::SCHEMA.encode(row, View::List, &Embedded::new()))
            .collect())
    }

    /// Load one entity. Ids that are not UUIDs cannot exist, so they are 404 too.
    pub async fn find<R: Resource>(state: &AppState, raw_id: &str) -> Result<R, AppError> {
        let not_found = || AppError::NotFound(R::SCHEMA.not_found());
        let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
        match state.store.fetch(R::TABLE, id).await? {
            Some(record) => R::from_record(record),
            None => Err(not_found()),
        }
    }

    pub async fn read<R: Resource>(state: &AppState, raw_id: &str) -> Result<Fields, AppError> {
        let entity = Self::find::<R>(state, raw_id).await?;
        Self::render(state, &entity).await
    }

    pub async fn create<R: Resource>(state: &AppState, body: &Value) -> Result<Fields, AppError> {
        let fields = R::SCHEMA.decode(body, Mode::Full)?;
        check_references::<R>(state, &fields).await?;
        let entity = R::build(state, fields).await?;
        entity.validate()?;
        let record = entity.to_record()?;
        ensure_unique::<R>(state, &record, None).await?;
        let stored = R::from_record(state.store.insert(R::TABLE, record).await?)?;
        tracing::info!(entity = R::TABLE.singular, id = %stored.id(), "created");
        Self::render(state, &stored).await
    }

    /// Partial update: only supplied fields change; updated-at is re-stamped.
    ///
    /// Rules run against the fully merged entity, but only the supplied columns are
    /// written, so concurrent updates of different fields never undo each other.
    pub async fn update<R: Resource>(state: &AppState, raw_id: &str, body: &Value) -> Result<Fields, AppError> {
        let mut fields = R::SCHEMA.decode(body, Mode::Partial)?;
        let current = Self::find::<R>(state, raw_id).await?;
        check_references::<R>(state, &fields).await?;
        R::prepare_update(state, &current, &mut fields).await?;
        let supplied: Vec<String> = fields.keys().cloned().collect();
        let merged = current.merge(fields)?;
        merged.validate()?;
        let record = merged.to_record()?;
        ensure_unique::<R>(state, &record, Some(current.id())).await?;
        let changes = supplied_columns(&record, &supplied);
        let stored = state
            .store
            .update(R::TABLE, current.id(), changes)
            .await?
            .ok_or_else(|| AppError::NotFound(R::SCHEMA.not_found()))?;
        let stored = R::from_record(stored)?;
        tracing::info!(entity = R::TABLE.singular, id = %stored.id(), "updated");
        Self::render(state, &stored).await
    }

    pub async fn delete<R: Resource>(state: &AppState, raw_id: &str) -> Result<(), AppError> {
        let current = Self::find::<R>(state, raw_id).await?;
        ensure_unreferenced::<R>(state, current.id()).await?;
        if !state.store.delete(R::TABLE, current.id()).await? {
            return Err(AppError::NotFound(R::SCHEMA.not_found()));
        }
        tracing::info!(entity = R::TABLE.singular, id = %current.id(), "deleted");
        Ok(())
    }

    /// Full encoding with nested relations.
    pub async fn render<R: Resource>(state: &AppState, entity: &R) -> Result<Fields, AppError> {
        let record = entity.to_record()?;
        let embedded = R::embed(state, entity).await?;
        Ok(R::SCHEMA.encode(&record, View::Full, &embedded))
    }
}

/// Supplied columns plus updated-at, valued from the merged row so normalisation
/// (e.g. the implied CUSTOMER role) is kept.
fn supplied_columns(merged: &Record, supplied: &[String]) -> Record {
    supplied
        .iter()
        .map(String::as_str)
        .chain(std::iter::once("updated_at"))
        .filter_map(|col| merged.get(col).map(|v| (col.to_string(), v.clone())))
        .collect()
}
