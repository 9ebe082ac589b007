//! Generic decode (wire -> storage) and encode (storage -> wire) driven by field tables.

use super::field::{FieldKind, FieldSpec, Schema};
use crate::error::{AppError, FieldErrors};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Field mapping keyed by storage name (decoded input) or wire name (encoded output).
pub type Fields = Map<String, Value>;

/// Resolved related records for nested encoding, keyed by relation name.
pub type Embedded = HashMap<&'static str, Fields>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Create: required fields must be present.
    Full,
    /// Update: only supplied fields are checked.
    Partial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Full,
    List,
}

pub const MISSING: &str = "Missing data for required field.";
pub const NOT_NULL: &str = "Field may not be null.";

/// Dot-atom local part; the domain needs at least one dot unless it is `localhost`.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:localhost|[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+)$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

impl Schema {
    /// Validate and coerce a request body. Every declared field is checked before returning,
    /// so the error map lists all offending fields at once.
    pub fn decode(&self, input: &Value, mode: Mode) -> Result<Fields, AppError> {
        let obj = input
            .as_object()
            .ok_or_else(|| AppError::BadRequest("body must be a JSON object".into()))?;
        let mut out = Fields::new();
        let mut errors = FieldErrors::new();
        for field in self.fields.iter().filter(|f| f.is_writable()) {
            match obj.get(field.wire) {
                None => {
                    if field.required && mode == Mode::Full {
                        errors.entry(field.wire.into()).or_default().push(MISSING.into());
                    }
                }
                Some(Value::Null) if field.nullable => {
                    out.insert(field.name.into(), Value::Null);
                }
                Some(Value::Null) => {
                    errors.entry(field.wire.into()).or_default().push(NOT_NULL.into());
                }
                Some(v) => match coerce(field, v) {
                    Ok(value) => {
                        out.insert(field.name.into(), value);
                    }
                    Err(message) => errors.entry(field.wire.into()).or_default().push(message),
                },
            }
        }
        if errors.is_empty() {
            Ok(out)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Render a storage record with wire names. Write-only fields are never emitted.
    pub fn encode(&self, record: &Fields, view: View, embedded: &Embedded) -> Fields {
        let mut out = Fields::with_capacity(self.fields.len() + self.nested.len() + 1);
        out.insert("type".into(), Value::String(self.type_tag.into()));
        for field in self.fields.iter().filter(|f| f.is_readable()) {
            let value = record.get(field.name).cloned().unwrap_or(Value::Null);
            out.insert(field.wire.into(), value);
        }
        for nested in self.nested {
            if view == View::List && !nested.in_list {
                continue;
            }
            let value = embedded
                .get(nested.name)
                .map(|r| Value::Object(nested.schema.encode(r, View::Full, &Embedded::new())))
                .unwrap_or(Value::Null);
            out.insert(nested.name.into(), value);
        }
        out
    }
}

fn coerce(field: &FieldSpec, v: &Value) -> Result<Value, String> {
    match field.kind {
        FieldKind::String => {
            let s = v.as_str().ok_or("Not a valid string.")?;
            check_length(field, s)?;
            Ok(Value::String(s.to_string()))
        }
        FieldKind::Email => {
            let s = v.as_str().ok_or("Not a valid email address.")?;
            check_length(field, s)?;
            if !email_regex().is_match(s) {
                return Err("Not a valid email address.".into());
            }
            Ok(Value::String(s.to_string()))
        }
        FieldKind::Boolean => coerce_bool(v).map(Value::Bool).ok_or_else(|| "Not a valid boolean.".into()),
        FieldKind::StringList => {
            let items = v.as_array().ok_or("Not a valid list.")?;
            let mut out: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                let s = item.as_str().ok_or("Not a valid string.")?;
                if let Some(allowed) = field.allowed {
                    if !allowed.contains(&s) {
                        return Err(format!("Must be one of: {}.", allowed.join(", ")));
                    }
                }
                let value = Value::String(s.to_string());
                if !out.contains(&value) {
                    out.push(value);
                }
            }
            Ok(Value::Array(out))
        }
        FieldKind::DateTime => {
            let s = v.as_str().ok_or("Not a valid datetime.")?;
            let parsed = DateTime::parse_from_rfc3339(s).map_err(|_| "Not a valid datetime.")?;
            Ok(Value::String(
                parsed.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Micros, true),
            ))
        }
        FieldKind::Identifier => {
            let s = v.as_str().ok_or("Not a valid UUID.")?;
            let id = uuid::Uuid::parse_str(s).map_err(|_| "Not a valid UUID.")?;
            Ok(Value::String(id.to_string()))
        }
        FieldKind::Integer => v
            .as_i64()
            .filter(|n| i32::try_from(*n).is_ok())
            .map(|n| Value::Number(n.into()))
            .ok_or_else(|| "Not a valid integer.".into()),
    }
}

fn check_length(field: &FieldSpec, s: &str) -> Result<(), String> {
    match field.max_length {
        Some(max) if s.chars().count() > max => Err(format!("Longer than maximum length {}.", max)),
        _ => Ok(()),
    }
}

fn coerce_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "t" | "T" | "true" | "True" | "TRUE" | "1" => Some(true),
            "f" | "F" | "false" | "False" | "FALSE" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
