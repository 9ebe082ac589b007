//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from table descriptors.

use super::params::PgBindValue;
use crate::store::{ColumnKind, Filter, Record, Table};
use serde_json::Value;
use uuid::Uuid;

/// Quote identifier for PostgreSQL (safe: only from static descriptors and validated config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// Push a column value and return its cast placeholder, e.g. `$3::uuid`.
    fn placeholder(&mut self, kind: ColumnKind, v: &Value) -> String {
        let n = self.push_param(PgBindValue::from_column(kind, v));
        format!("${}::{}", n, kind.cast_type())
    }
}

fn select_column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn select_by_id(schema: &str, table: &Table, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Uuid(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(table),
        qualified_table(schema, table.name),
        quoted("id"),
        n
    );
    q
}

/// SELECT rows matching `filter`, ORDER BY id. Terms on unknown columns never match.
pub fn select_where(schema: &str, table: &Table, filter: &Filter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    match filter {
        Filter::All => {}
        Filter::Eq(terms) => {
            for (col, val) in terms {
                match table.column(col) {
                    Some(c) if !val.is_null() => {
                        let ph = q.placeholder(c.kind, val);
                        where_parts.push(format!("{} = {}", quoted(col), ph));
                    }
                    _ => where_parts.push("FALSE".into()),
                }
            }
        }
        Filter::ContainsAny(col, values) => match table.column(col) {
            Some(c) if c.kind == ColumnKind::TextArray => {
                let ph = q.placeholder(c.kind, &Value::Array(values.clone()));
                where_parts.push(format!("{} && {}", quoted(col), ph));
            }
            _ => where_parts.push("FALSE".into()),
        },
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list(table),
        qualified_table(schema, table.name),
        where_clause,
        quoted("id")
    );
    q
}

/// INSERT every column except `id`. Columns with a DB default are omitted when the record
/// has no value for them, so the default applies.
pub fn insert(schema: &str, table: &Table, record: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in table.columns.iter().filter(|c| c.name != "id") {
        let val = record.get(c.name).unwrap_or(&Value::Null);
        if val.is_null() && c.default.is_some() {
            continue;
        }
        placeholders.push(q.placeholder(c.kind, val));
        cols.push(quoted(c.name));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        qualified_table(schema, table.name),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(table)
    );
    q
}

/// UPDATE by id: SET every column present in the record except `id` and `created_at`.
pub fn update(schema: &str, table: &Table, id: Uuid, record: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in table.columns.iter().filter(|c| c.name != "id" && c.name != "created_at") {
        let Some(val) = record.get(c.name) else { continue };
        let rhs = q.placeholder(c.kind, val);
        sets.push(format!("{} = {}", quoted(c.name), rhs));
    }
    let table_name = qualified_table(schema, table.name);
    let returning = select_column_list(table);
    let id_param = q.push_param(PgBindValue::Uuid(id));
    if sets.is_empty() {
        q.sql = format!("SELECT {} FROM {} WHERE {} = ${}", returning, table_name, quoted("id"), id_param);
        return q;
    }
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        table_name,
        sets.join(", "),
        quoted("id"),
        id_param,
        returning
    );
    q
}

/// DELETE by id.
pub fn delete(schema: &str, table: &Table, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Uuid(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        qualified_table(schema, table.name),
        quoted("id"),
        n,
        quoted("id")
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ACCOUNTS, ORGANISATIONS};
    use serde_json::json;

    #[test]
    fn select_by_id_binds_uuid() {
        let id = Uuid::new_v4();
        let q = select_by_id("party", &ACCOUNTS, id);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "created_at", "updated_at", "name", "organisation_id" FROM "party"."accounts" WHERE "id" = $1"#
        );
        assert_eq!(q.params, vec![PgBindValue::Uuid(id)]);
    }

    #[test]
    fn select_where_casts_and_orders() {
        let org = Uuid::new_v4();
        let q = select_where("party", &ACCOUNTS, &Filter::eq("organisation_id", org.to_string()));
        assert!(q.sql.ends_with(r#"WHERE "organisation_id" = $1::uuid ORDER BY "id""#), "{}", q.sql);
        assert_eq!(q.params, vec![PgBindValue::Uuid(org)]);
    }

    #[test]
    fn contains_any_uses_array_overlap() {
        let q = select_where(
            "party",
            &ORGANISATIONS,
            &Filter::ContainsAny("roles", vec![json!("SUPPLIER"), json!("PLATFORM_OPERATOR")]),
        );
        assert!(q.sql.contains(r#"WHERE "roles" && $1::text[]"#), "{}", q.sql);
    }

    #[test]
    fn null_filter_term_matches_nothing() {
        let q = select_where("party", &ORGANISATIONS, &Filter::eq("supplier_id", Value::Null));
        assert!(q.sql.contains("WHERE FALSE"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_skips_id_and_defaulted_nulls() {
        let record = json!({"id": "x", "name": "Main", "organisation_id": Uuid::nil().to_string()});
        let q = insert("party", &ACCOUNTS, record.as_object().unwrap());
        assert_eq!(
            q.sql,
            r#"INSERT INTO "party"."accounts" ("name", "organisation_id") VALUES ($1::text, $2::uuid) RETURNING "id", "created_at", "updated_at", "name", "organisation_id""#
        );
    }

    #[test]
    fn update_sets_present_columns_and_binds_id_last() {
        let id = Uuid::new_v4();
        let record = json!({"id": id.to_string(), "created_at": "2024-01-01T00:00:00Z", "name": "Ops"});
        let q = update("party", &ACCOUNTS, id, record.as_object().unwrap());
        assert!(q.sql.starts_with(r#"UPDATE "party"."accounts" SET "name" = $1::text WHERE "id" = $2"#), "{}", q.sql);
        assert_eq!(q.params.last(), Some(&PgBindValue::Uuid(id)));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quoted(r#"we"ird"#), r#""we""ird""#);
        assert_eq!(qualified_table("a", "b"), r#""a"."b""#);
    }
}
