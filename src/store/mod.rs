//! Entity store: keyed, transactional row storage behind one trait.
//!
//! Rows travel as JSON objects keyed by column name. Every write is a single atomic
//! operation; unique keys and foreign keys declared on the [`Table`] are enforced by
//! every backend and surface as [`AppError::Conflict`] / [`AppError::BadRequest`].

mod filter;
mod memory;
mod postgres;
mod table;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};
pub use table::{
    table_by_name, Column, ColumnKind, ForeignKey, OnDelete, Table, ACCOUNTS, ALL_TABLES, CREDENTIALS,
    ORGANISATIONS, USERS,
};

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

/// One stored row keyed by column name.
pub type Record = Map<String, Value>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a row; the store assigns `id` and ignores any caller-supplied one.
    async fn insert(&self, table: &'static Table, record: Record) -> Result<Record, AppError>;

    async fn fetch(&self, table: &'static Table, id: Uuid) -> Result<Option<Record>, AppError>;

    /// Rows matching `filter`, ordered by id.
    async fn fetch_where(&self, table: &'static Table, filter: &Filter) -> Result<Vec<Record>, AppError>;

    /// Overwrite the given columns of row `id`; other columns keep their stored values.
    /// `None` when the row does not exist.
    async fn update(&self, table: &'static Table, id: Uuid, record: Record) -> Result<Option<Record>, AppError>;

    /// Remove row `id`, applying foreign-key delete rules. `false` when nothing was removed.
    async fn delete(&self, table: &'static Table, id: Uuid) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    async fn fetch_all(&self, table: &'static Table) -> Result<Vec<Record>, AppError> {
        self.fetch_where(table, &Filter::All).await
    }
}

pub(crate) fn unique_violation(table: &Table, key: &[&str]) -> AppError {
    AppError::Conflict(format!(
        "unique constraint violated: {}",
        table.unique_constraint_name(key)
    ))
}

pub(crate) fn dangling_reference(table: &Table, fk: &ForeignKey) -> AppError {
    AppError::BadRequest(format!(
        "foreign key violated: {}",
        table.foreign_key_name(fk)
    ))
}

pub(crate) fn still_referenced(table: &Table, by: &Table, fk: &ForeignKey) -> AppError {
    AppError::Conflict(format!(
        "{} is still referenced: {}",
        table.singular,
        by.foreign_key_name(fk)
    ))
}
