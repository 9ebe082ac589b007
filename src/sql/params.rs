//! Convert JSON column values to types that sqlx can bind.

use crate::store::ColumnKind;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};
use uuid::Uuid;

/// A value that can be bound to a PostgreSQL query. Built from a JSON value and the
/// storage kind of the column it targets.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    Text(String),
    Uuid(Uuid),
    TextArray(Vec<String>),
}

impl PgBindValue {
    pub fn from_column(kind: ColumnKind, v: &Value) -> Self {
        match (kind, v) {
            (_, Value::Null) => PgBindValue::Null,
            (ColumnKind::Uuid, Value::String(s)) => match Uuid::parse_str(s) {
                Ok(u) => PgBindValue::Uuid(u),
                Err(_) => PgBindValue::Text(s.clone()),
            },
            (ColumnKind::TextArray, Value::Array(items)) => PgBindValue::TextArray(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            (_, Value::Bool(b)) => PgBindValue::Bool(*b),
            (_, Value::Number(n)) => match n.as_i64() {
                Some(i) => PgBindValue::I64(i),
                None => PgBindValue::Text(n.to_string()),
            },
            (_, Value::String(s)) => PgBindValue::Text(s.clone()),
            (_, other) => PgBindValue::Text(other.to_string()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self {
            PgBindValue::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf),
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf),
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::Text(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf),
            PgBindValue::Uuid(u) => <Uuid as Encode<Postgres>>::encode_by_ref(u, buf),
            PgBindValue::TextArray(v) => <Vec<String> as Encode<Postgres>>::encode_by_ref(v, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null | PgBindValue::Text(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::Uuid(_) => <Uuid as Type<Postgres>>::type_info(),
            PgBindValue::TextArray(_) => <Vec<String> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uuid_columns_bind_as_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(
            PgBindValue::from_column(ColumnKind::Uuid, &json!(id.to_string())),
            PgBindValue::Uuid(id)
        );
        assert_eq!(
            PgBindValue::from_column(ColumnKind::Text, &json!(id.to_string())),
            PgBindValue::Text(id.to_string())
        );
    }

    #[test]
    fn arrays_bind_as_text_arrays() {
        assert_eq!(
            PgBindValue::from_column(ColumnKind::TextArray, &json!(["CUSTOMER", "SUPPLIER"])),
            PgBindValue::TextArray(vec!["CUSTOMER".into(), "SUPPLIER".into()])
        );
    }

    #[test]
    fn scalars() {
        assert_eq!(PgBindValue::from_column(ColumnKind::Boolean, &json!(true)), PgBindValue::Bool(true));
        assert_eq!(PgBindValue::from_column(ColumnKind::Integer, &json!(3)), PgBindValue::I64(3));
        assert_eq!(PgBindValue::from_column(ColumnKind::Timestamp, &Value::Null), PgBindValue::Null);
    }
}
