//! Row predicates shared by every store backend.

use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    All,
    /// Conjunction of column equalities. A null value never matches.
    Eq(Vec<(&'static str, Value)>),
    /// Array column shares at least one element with the given values.
    ContainsAny(&'static str, Vec<Value>),
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq(vec![(column, value.into())])
    }

    /// Add an equality term; turns `All` into `Eq`.
    pub fn and(self, column: &'static str, value: impl Into<Value>) -> Self {
        match self {
            Filter::All => Filter::eq(column, value),
            Filter::Eq(mut terms) => {
                terms.push((column, value.into()));
                Filter::Eq(terms)
            }
            other @ Filter::ContainsAny(..) => other,
        }
    }

    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(terms) => terms
                .iter()
                .all(|(col, value)| !value.is_null() && record.get(*col) == Some(value)),
            Filter::ContainsAny(col, values) => match record.get(*col) {
                Some(Value::Array(items)) => items.iter().any(|item| values.contains(item)),
                _ => false,
            },
        }
    }
}
