//! Standard response envelope helpers.

use crate::schema::{Fields, Schema};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

/// Collection envelope. `start` is 1-based and lists are never paged, so `count == total`.
#[derive(Debug, Serialize)]
pub struct ResourceList {
    pub category: &'static str,
    #[serde(rename = "type")]
    pub list_type: &'static str,
    pub count: u64,
    pub total: u64,
    pub start: u64,
    pub members: Vec<Fields>,
}

/// Single resource: `category` followed by the encoded entity fields.
pub fn resource_response(schema: &Schema, status: StatusCode, fields: Fields) -> (StatusCode, Json<Value>) {
    let mut body = Fields::with_capacity(fields.len() + 1);
    body.insert("category".into(), Value::String(schema.category.into()));
    body.extend(fields);
    (status, Json(Value::Object(body)))
}

pub fn list_response(
    category: &'static str,
    list_type: &'static str,
    members: Vec<Fields>,
) -> (StatusCode, Json<ResourceList>) {
    let count = members.len() as u64;
    (
        StatusCode::OK,
        Json(ResourceList {
            category,
            list_type,
            count,
            total: count,
            start: 1,
            members,
        }),
    )
}

pub fn error_body(message: &str) -> Value {
    serde_json::json!({ "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ACCOUNT;
    use serde_json::json;

    #[test]
    fn single_resource_is_prefixed_with_category() {
        let mut fields = Fields::new();
        fields.insert("type".into(), json!("AccountV1"));
        fields.insert("name".into(), json!("Ops"));
        let (status, Json(body)) = resource_response(&ACCOUNT, StatusCode::CREATED, fields);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"category": "accounts", "type": "AccountV1", "name": "Ops"}));
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "category");
    }

    #[test]
    fn list_envelope_counts_members() {
        let (status, Json(list)) = list_response("users", "UserListV1", vec![Fields::new(), Fields::new()]);
        assert_eq!(status, StatusCode::OK);
        let body = serde_json::to_value(&list).unwrap();
        assert_eq!(body["type"], "UserListV1");
        assert_eq!(body["count"], 2);
        assert_eq!(body["total"], 2);
        assert_eq!(body["start"], 1);
        assert_eq!(body["members"].as_array().unwrap().len(), 2);
    }
}
