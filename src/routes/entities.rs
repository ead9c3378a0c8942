// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generic CRUD routes over the three record collections.
//!
//! `{entity}` is one of `Exercise`, `WorkoutTemplate`, `WorkoutSession`.
//! Clients re-fetch after mutations; there are no change notifications.

use crate::db::store::SORT_CREATED_DESC;
use crate::db::{CollectionKind, DeleteResult, ListQuery, Record, SortOrder};
use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/entities/{entity}",
            get(list_records).post(create_record),
        )
        .route(
            "/api/entities/{entity}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
}

#[derive(Deserialize)]
struct ListParams {
    /// Only `-created_date` sorts; anything else keeps storage order
    #[serde(default = "default_sort")]
    sort: String,
    limit: Option<usize>,
}

fn default_sort() -> String {
    SORT_CREATED_DESC.to_string()
}

fn parse_kind(entity: &str) -> Result<CollectionKind> {
    entity.parse::<CollectionKind>().map_err(AppError::from)
}

fn into_object(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

async fn list_records(
    State(state): State<Arc<AppState>>,
    Path(entity): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Record>>> {
    let kind = parse_kind(&entity)?;
    let query = ListQuery {
        sort: SortOrder::parse(&params.sort),
        limit: params.limit,
    };

    let records = state.store.collection(kind).list(query).await;
    tracing::debug!(collection = %kind, count = records.len(), "Listed records");
    Ok(Json(records))
}

async fn get_record(
    State(state): State<Arc<AppState>>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Json<Record>> {
    let kind = parse_kind(&entity)?;
    let record = state.store.collection(kind).get(&id).await?;
    Ok(Json(record))
}

async fn create_record(
    State(state): State<Arc<AppState>>,
    Path(entity): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Record>)> {
    let kind = parse_kind(&entity)?;
    let record = state
        .store
        .collection(kind)
        .create(into_object(body)?)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_record(
    State(state): State<Arc<AppState>>,
    Path((entity, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Record>> {
    let kind = parse_kind(&entity)?;
    let record = state
        .store
        .collection(kind)
        .update(&id, into_object(body)?)
        .await?;
    Ok(Json(record))
}

async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Json<DeleteResult>> {
    let kind = parse_kind(&entity)?;
    let result = state.store.collection(kind).delete(&id).await?;
    Ok(Json(result))
}
