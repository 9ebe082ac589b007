//! Create the party schema: tables, unique keys, foreign keys and lookup indexes.
//! Order follows PostgreSQL dependencies (referenced tables first, FKs last).

use crate::error::AppError;
use crate::sql::{qualified_table, quoted};
use crate::store::{Table, ALL_TABLES};
use sqlx::PgPool;

/// CREATE TABLE statement with column defaults, primary key and named unique constraints.
pub fn create_table_sql(schema: &str, table: &Table) -> String {
    let mut defs: Vec<String> = Vec::new();
    for c in table.columns {
        let mut def = format!("{} {}", quoted(c.name), c.kind.ddl_type());
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(d) = c.default {
            def.push_str(" DEFAULT ");
            def.push_str(d);
        }
        defs.push(def);
    }
    defs.push(format!("PRIMARY KEY ({})", quoted("id")));
    for key in table.unique {
        let cols: Vec<String> = key.iter().map(|s| quoted(s)).collect();
        defs.push(format!(
            "CONSTRAINT {} UNIQUE ({})",
            quoted(&table.unique_constraint_name(key)),
            cols.join(", ")
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        qualified_table(schema, table.name),
        defs.join(",\n  ")
    )
}

/// `(constraint name, ALTER TABLE)` per foreign key. The statement fails when the
/// constraint already exists, so callers check [`CONSTRAINT_EXISTS_SQL`] first.
pub fn foreign_key_sql(schema: &str, table: &Table) -> Vec<(String, String)> {
    table
        .foreign_keys
        .iter()
        .map(|fk| {
            let name = table.foreign_key_name(fk);
            let sql = format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON UPDATE NO ACTION ON DELETE {}",
                qualified_table(schema, table.name),
                quoted(&name),
                quoted(fk.column),
                qualified_table(schema, fk.references),
                quoted("id"),
                fk.on_delete.as_sql()
            );
            (name, sql)
        })
        .collect()
}

/// `$1` constraint name, `$2` schema name.
pub const CONSTRAINT_EXISTS_SQL: &str = "SELECT EXISTS (SELECT 1 FROM pg_constraint c \
     JOIN pg_namespace n ON n.oid = c.connamespace WHERE c.conname = $1 AND n.nspname = $2)";

async fn constraint_exists(pool: &PgPool, schema: &str, name: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(CONSTRAINT_EXISTS_SQL)
        .bind(name)
        .bind(schema)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Index every foreign key column; list-by-owner queries filter on them.
pub fn index_sql(schema: &str, table: &Table) -> Vec<String> {
    table
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} USING btree ({})",
                quoted(&format!("idx_{}_{}", table.name, fk.column)),
                qualified_table(schema, table.name),
                quoted(fk.column)
            )
        })
        .collect()
}

/// Idempotent: schema, tables and indexes use IF NOT EXISTS; a foreign key is added only
/// when `pg_constraint` does not list it yet. Any other failure aborts startup.
pub async fn apply_migrations(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;

    for table in ALL_TABLES {
        sqlx::query(&create_table_sql(schema, table)).execute(pool).await?;
    }

    for table in ALL_TABLES {
        for sql in index_sql(schema, table) {
            sqlx::query(&sql).execute(pool).await?;
        }
        for (name, sql) in foreign_key_sql(schema, table) {
            if constraint_exists(pool, schema, &name).await? {
                tracing::debug!(table = table.name, constraint = %name, "foreign key present");
                continue;
            }
            sqlx::query(&sql).execute(pool).await?;
            tracing::info!(table = table.name, constraint = %name, "foreign key added");
        }
    }

    tracing::info!(schema, "migrations applied");
    Ok(())
}
