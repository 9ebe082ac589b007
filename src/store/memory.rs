//! In-process store. One lock serialises all writes, so racing unique keys resolve to a
//! single winner exactly like the database constraints do.

use super::{dangling_reference, still_referenced, unique_violation, Filter, Record, Store, Table, ALL_TABLES};
use crate::error::AppError;
use crate::store::OnDelete;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

type Rows = BTreeMap<Uuid, Record>;
type Tables = HashMap<&'static str, Rows>;

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))
    }
}

/// Keep only declared columns; absent columns read back as null.
fn normalise(table: &Table, mut record: Record, id: Uuid) -> Record {
    let mut out = Record::with_capacity(table.columns.len());
    for col in table.columns {
        let value = if col.name == "id" {
            Value::String(id.to_string())
        } else {
            record.remove(col.name).unwrap_or(Value::Null)
        };
        out.insert(col.name.into(), value);
    }
    out
}

fn check_unique(tables: &Tables, table: &Table, record: &Record, own: Uuid) -> Result<(), AppError> {
    let Some(rows) = tables.get(table.name) else {
        return Ok(());
    };
    for key in table.unique {
        let filter = Filter::Eq(
            key.iter()
                .map(|col| (*col, record.get(*col).cloned().unwrap_or(Value::Null)))
                .collect(),
        );
        if rows.iter().any(|(id, row)| *id != own && filter.matches(row)) {
            return Err(unique_violation(table, key));
        }
    }
    Ok(())
}

fn check_references(tables: &Tables, table: &Table, record: &Record) -> Result<(), AppError> {
    for fk in table.foreign_keys {
        let target = match record.get(fk.column) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => Uuid::parse_str(s).ok(),
            Some(_) => None,
        };
        let exists = target
            .and_then(|id| tables.get(fk.references).map(|rows| rows.contains_key(&id)))
            .unwrap_or(false);
        if !exists {
            return Err(dangling_reference(table, fk));
        }
    }
    Ok(())
}

/// Rows removed along with `(table, id)`; fails on the first RESTRICT reference.
fn collect_cascade(
    tables: &Tables,
    table: &'static Table,
    id: Uuid,
    doomed: &mut Vec<(&'static Table, Uuid)>,
) -> Result<(), AppError> {
    let key = Value::String(id.to_string());
    for dependent in ALL_TABLES {
        let Some(rows) = tables.get(dependent.name) else {
            continue;
        };
        for fk in dependent.foreign_keys.iter().filter(|fk| fk.references == table.name) {
            for (row_id, row) in rows {
                if row.get(fk.column) != Some(&key) || (dependent.name == table.name && *row_id == id) {
                    continue;
                }
                match fk.on_delete {
                    OnDelete::Restrict => return Err(still_referenced(table, dependent, fk)),
                    OnDelete::Cascade => {
                        doomed.push((dependent, *row_id));
                        collect_cascade(tables, dependent, *row_id, doomed)?;
                    }
                }
            }
        }
    }
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: &'static Table, record: Record) -> Result<Record, AppError> {
        let mut tables = self.write()?;
        let id = Uuid::new_v4();
        let record = normalise(table, record, id);
        check_unique(&tables, table, &record, id)?;
        check_references(&tables, table, &record)?;
        tables.entry(table.name).or_default().insert(id, record.clone());
        tracing::debug!(table = table.name, %id, "insert");
        Ok(record)
    }

    async fn fetch(&self, table: &'static Table, id: Uuid) -> Result<Option<Record>, AppError> {
        let tables = self.read()?;
        Ok(tables.get(table.name).and_then(|rows| rows.get(&id)).cloned())
    }

    async fn fetch_where(&self, table: &'static Table, filter: &Filter) -> Result<Vec<Record>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .get(table.name)
            .map(|rows| rows.values().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn update(&self, table: &'static Table, id: Uuid, record: Record) -> Result<Option<Record>, AppError> {
        let mut tables = self.write()?;
        let Some(mut row) = tables.get(table.name).and_then(|rows| rows.get(&id)).cloned() else {
            return Ok(None);
        };
        for (col, value) in record {
            if col != "id" && col != "created_at" && table.column(&col).is_some() {
                row.insert(col, value);
            }
        }
        let record = normalise(table, row, id);
        check_unique(&tables, table, &record, id)?;
        check_references(&tables, table, &record)?;
        tables.entry(table.name).or_default().insert(id, record.clone());
        tracing::debug!(table = table.name, %id, "update");
        Ok(Some(record))
    }

    async fn delete(&self, table: &'static Table, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        if !tables.get(table.name).is_some_and(|rows| rows.contains_key(&id)) {
            return Ok(false);
        }
        let mut doomed = Vec::new();
        collect_cascade(&tables, table, id, &mut doomed)?;
        doomed.push((table, id));
        for (t, row_id) in doomed {
            if let Some(rows) = tables.get_mut(t.name) {
                rows.remove(&row_id);
            }
        }
        tracing::debug!(table = table.name, %id, "delete");
        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
