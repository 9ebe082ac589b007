//! Generic resource handlers: list, create, read, update, delete.

use crate::error::AppError;
use crate::response::{list_response, resource_response};
use crate::service::{CrudService, Resource};
use crate::state::AppState;
use crate::store::Filter;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// Malformed or non-JSON bodies become a 400 in the standard error shape.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|e| AppError::BadRequest(e.body_text()))
}

pub async fn list<R: Resource>(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let members = CrudService::list::<R>(&state, &Filter::All).await?;
    Ok(list_response(R::SCHEMA.category, R::SCHEMA.list_type, members))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(body)?;
    let fields = CrudService::create::<R>(&state, &body).await?;
    Ok(resource_response(R::SCHEMA, StatusCode::CREATED, fields))
}

pub async fn read<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let fields = CrudService::read::<R>(&state, &id).await?;
    Ok(resource_response(R::SCHEMA, StatusCode::OK, fields))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(body)?;
    let fields = CrudService::update::<R>(&state, &id, &body).await?;
    Ok(resource_response(R::SCHEMA, StatusCode::OK, fields))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    CrudService::delete::<R>(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
