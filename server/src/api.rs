//! Route handlers for `/todos`.
//!
//! Bodies are read as raw bytes and decoded here, so a malformed or
//! mistyped payload is a 400 whatever the `Content-Type` header says. Only
//! the first JSON value is read: trailing data is ignored and `null` decodes
//! to the zero-value todo. Keys match exactly (`text`, `completed`).

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use todo_core::Todo;

use crate::error::AppError;
use crate::store::SharedStore;

fn parse_id(raw: String) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::InvalidId(raw))
}

/// The inbound payload is todo-shaped; any `id` it carries is ignored.
fn decode_todo(body: &[u8]) -> Result<Todo, AppError> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Todo>>()
        .next()
        .ok_or_else(|| <serde_json::Error as serde::de::Error>::custom("empty request body"))??;
    Ok(first.unwrap_or_default())
}

pub async fn list_todos(State(store): State<SharedStore>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = store.list().await.map_err(AppError::store("fetch todos"))?;
    tracing::info!(count = todos.len(), "returning todos");
    Ok(Json(todos))
}

pub async fn create_todo(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<Json<Todo>, AppError> {
    let input = decode_todo(&body)?;
    let todo = store
        .create(input.text, input.completed)
        .await
        .map_err(AppError::store("create todo"))?;
    tracing::info!(id = todo.id, text = %todo.text, completed = todo.completed, "created todo");
    Ok(Json(todo))
}

pub async fn update_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(id)?;
    let input = decode_todo(&body)?;
    let todo = store
        .update(id, input.text, input.completed)
        .await
        .map_err(AppError::store("update todo"))?;
    tracing::info!(id, text = %todo.text, completed = todo.completed, "updated todo");
    Ok(Json(todo))
}

pub async fn toggle_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(id)?;
    let todo = store
        .toggle(id)
        .await
        .map_err(AppError::store("toggle todo"))?;
    tracing::info!(id, completed = todo.completed, "toggled todo");
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(id)?;
    store
        .delete(id)
        .await
        .map_err(AppError::store("delete todo"))?;
    tracing::info!(id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
