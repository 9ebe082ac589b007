//! PostgreSQL store. Each operation is one statement, so every write is atomic and the
//! database constraints created by the migration settle concurrent races.

use super::{ColumnKind, Filter, Record, Store, Table};
use crate::error::AppError;
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStore {
            pool,
            schema: schema.into(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_one(&self, table: &Table, q: QueryBuf) -> Result<Option<Record>, sqlx::Error> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| row_to_record(table, &r)).transpose()
    }

    async fn fetch_many(&self, table: &Table, q: QueryBuf) -> Result<Vec<Record>, sqlx::Error> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(|r| row_to_record(table, r)).collect()
    }
}

/// Translate constraint violations into the same errors the in-memory store raises.
fn write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        let constraint = db.constraint().unwrap_or("unknown").to_string();
        match db.code().as_deref() {
            Some("23505") => return AppError::Conflict(format!("unique constraint violated: {}", constraint)),
            Some("23503") => return AppError::BadRequest(format!("foreign key violated: {}", constraint)),
            _ => {}
        }
    }
    AppError::Db(err)
}

fn delete_error(table: &Table, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23503") {
            return AppError::Conflict(format!(
                "{} is still referenced: {}",
                table.singular,
                db.constraint().unwrap_or("unknown")
            ));
        }
    }
    AppError::Db(err)
}

fn row_to_record(table: &Table, row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut map = Record::with_capacity(table.columns.len());
    for col in table.columns {
        let name = col.name;
        let v = match col.kind {
            ColumnKind::Uuid => row
                .try_get::<Option<Uuid>, _>(name)?
                .map(|u| Value::String(u.to_string())),
            ColumnKind::Text | ColumnKind::VarChar(_) => row.try_get::<Option<String>, _>(name)?.map(Value::String),
            ColumnKind::TextArray => row
                .try_get::<Option<Vec<String>>, _>(name)?
                .map(|v| Value::Array(v.into_iter().map(Value::String).collect())),
            ColumnKind::Boolean => row.try_get::<Option<bool>, _>(name)?.map(Value::Bool),
            ColumnKind::Integer => row.try_get::<Option<i32>, _>(name)?.map(|n| Value::Number(n.into())),
            ColumnKind::Timestamp => row
                .try_get::<Option<DateTime<Utc>>, _>(name)?
                .map(|d| Value::String(d.to_rfc3339_opts(SecondsFormat::Micros, true))),
        };
        map.insert(name.to_string(), v.unwrap_or(Value::Null));
    }
    Ok(map)
}

#[async_trait]
impl Store for PgStore {
    async fn insert(&self, table: &'static Table, record: Record) -> Result<Record, AppError> {
        let q = sql::insert(&self.schema, table, &record);
        self.fetch_one(table, q)
            .await
            .map_err(write_error)?
            .ok_or_else(|| AppError::Internal(format!("insert into {} returned no row", table.name)))
    }

    async fn fetch(&self, table: &'static Table, id: Uuid) -> Result<Option<Record>, AppError> {
        Ok(self.fetch_one(table, sql::select_by_id(&self.schema, table, id)).await?)
    }

    async fn fetch_where(&self, table: &'static Table, filter: &Filter) -> Result<Vec<Record>, AppError> {
        Ok(self.fetch_many(table, sql::select_where(&self.schema, table, filter)).await?)
    }

    async fn update(&self, table: &'static Table, id: Uuid, record: Record) -> Result<Option<Record>, AppError> {
        let q = sql::update(&self.schema, table, id, &record);
        self.fetch_one(table, q).await.map_err(write_error)
    }

    async fn delete(&self, table: &'static Table, id: Uuid) -> Result<bool, AppError> {
        let q = sql::delete(&self.schema, table, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| delete_error(table, e))?;
        Ok(row.is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Internal(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection URL into the admin URL (same server, `postgres` database) and the
/// target database name.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Internal("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}
