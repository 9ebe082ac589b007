//! Organisation listings: suppliers-only filter and relationship sub-lists.

use crate::error::AppError;
use crate::model::Organisation;
use crate::response::list_response;
use crate::schema::{ORGANISATION, USER};
use crate::service::{CrudService, OrganisationService};
use crate::state::AppState;
use crate::store::Filter;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

/// Present with any value other than empty, `false` or `0`.
fn truthy(value: Option<&String>) -> bool {
    match value.map(|v| v.trim()) {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = if truthy(params.get("suppliersOnly")) {
        OrganisationService::suppliers_filter()
    } else {
        Filter::All
    };
    let members = CrudService::list::<Organisation>(&state, &filter).await?;
    Ok(list_response(ORGANISATION.category, ORGANISATION.list_type, members))
}

pub async fn users(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let members = OrganisationService::users(&state, &id).await?;
    Ok(list_response(ORGANISATION.category, USER.list_type, members))
}

pub async fn customers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let members = OrganisationService::customers(&state, &id).await?;
    Ok(list_response(ORGANISATION.category, ORGANISATION.list_type, members))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppliers_only_truthiness() {
        for (raw, expected) in [
            ("true", true),
            ("1", true),
            ("yes", true),
            ("", false),
            ("0", false),
            ("false", false),
            ("FALSE", false),
        ] {
            assert_eq!(truthy(Some(&raw.to_string())), expected, "{:?}", raw);
        }
        assert!(!truthy(None));
    }
}
