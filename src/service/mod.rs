//! CrudService: generic CRUD over any [`Resource`], plus the per-entity hooks.

mod account;
mod credential;
mod crud;
mod organisation;
mod user;
mod validation;

pub use crud::CrudService;
pub use organisation::OrganisationService;

use crate::error::AppError;
use crate::model::Entity;
use crate::schema::{Embedded, Fields};
use crate::state::AppState;
use crate::store::{Record, Table};
use async_trait::async_trait;
use uuid::Uuid;

/// An entity exposed as a REST resource.
#[async_trait]
pub trait Resource: Entity {
    /// Message returned when a write collides with another entity's unique key.
    const CONFLICT: &'static str;

    /// Construct a new entity (defaults applied) from validated create fields.
    async fn build(state: &AppState, fields: Fields) -> Result<Self, AppError>;

    /// Rewrite validated update fields before they are merged.
    async fn prepare_update(_state: &AppState, _current: &Self, _fields: &mut Fields) -> Result<(), AppError> {
        Ok(())
    }

    /// Cross-field rules checked after construction or merge.
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Related rows for the full encoding, keyed by relation name.
    async fn embed(_state: &AppState, _entity: &Self) -> Result<Embedded, AppError> {
        Ok(Embedded::new())
    }
}

pub(crate) async fn fetch_record(state: &AppState, table: &'static Table, id: Uuid) -> Result<Option<Record>, AppError> {
    state.store.fetch(table, id).await
}
