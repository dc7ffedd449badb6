//! In-process stand-in for the remote todo datastore.
//!
//! Serves the slice of the PostgREST dialect the todo service relies on:
//! a single `todos` table under `/rest/v1`, `id=eq.<n>` row filters, an
//! `apikey` header check, and `Prefer: return=representation` echoes. A
//! filtered PUT inserts the row when the id is missing, as PostgREST does.
//! Rows are defined here independently of `todo-core` so that integration
//! tests catch schema drift between the two.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const TABLE_PATH: &str = "/rest/v1/todos";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

#[derive(Deserialize)]
struct InsertRow {
    text: String,
    #[serde(default)]
    completed: bool,
}

#[derive(Deserialize)]
struct ReplaceRow {
    id: i64,
    text: String,
    completed: bool,
}

#[derive(Default)]
struct Table {
    rows: Vec<Row>,
    last_id: i64,
}

/// Shared handle to the fake datastore. Clones see the same table.
#[derive(Clone)]
pub struct Upstream {
    table: Arc<RwLock<Table>>,
    api_key: Arc<str>,
    echo_rows: bool,
}

impl Upstream {
    pub fn new(api_key: &str) -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::default())),
            api_key: Arc::from(api_key),
            echo_rows: true,
        }
    }

    /// Ignore `Prefer: return=representation` and answer writes without a
    /// body, the way PostgREST does under `return=minimal`.
    pub fn minimal(mut self) -> Self {
        self.echo_rows = false;
        self
    }

    /// Current rows in insertion order.
    pub async fn rows(&self) -> Vec<Row> {
        self.table.read().await.rows.clone()
    }

    pub fn router(self) -> Router {
        Router::new()
            .route(
                TABLE_PATH,
                get(select_rows)
                    .post(insert_row)
                    .put(replace_row)
                    .delete(delete_rows),
            )
            .layer(middleware::from_fn_with_state(self.clone(), require_api_key))
            .with_state(self)
    }

    fn wants_rows(&self, headers: &HeaderMap) -> bool {
        self.echo_rows
            && headers
                .get_all("prefer")
                .iter()
                .filter_map(|value| value.to_str().ok())
                .any(|value| value.contains("return=representation"))
    }
}

pub fn app(api_key: &str) -> Router {
    Upstream::new(api_key).router()
}

pub async fn run(listener: TcpListener, upstream: Upstream) -> Result<(), std::io::Error> {
    axum::serve(listener, upstream.router()).await
}

async fn require_api_key(State(upstream): State<Upstream>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get("apikey")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == &*upstream.api_key);
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid apikey");
        return error(StatusCode::UNAUTHORIZED, "Invalid API key");
    }
    next.run(request).await
}

async fn select_rows(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let filter = match id_filter(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    let table = upstream.table.read().await;
    let rows: Vec<Row> = table
        .rows
        .iter()
        .filter(|row| filter.map_or(true, |id| row.id == id))
        .cloned()
        .collect();
    Json(rows).into_response()
}

async fn insert_row(State(upstream): State<Upstream>, headers: HeaderMap, body: Bytes) -> Response {
    let input: InsertRow = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => return error(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    let row = {
        let mut table = upstream.table.write().await;
        table.last_id += 1;
        let row = Row {
            id: table.last_id,
            text: input.text,
            completed: input.completed,
        };
        table.rows.push(row.clone());
        row
    };
    tracing::debug!(id = row.id, "inserted row");
    written(StatusCode::CREATED, upstream.wants_rows(&headers), vec![row])
}

async fn replace_row(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let id = match id_filter(&params) {
        Ok(Some(id)) => id,
        Ok(None) => return error(StatusCode::BAD_REQUEST, "PUT requires an id filter"),
        Err(response) => return response,
    };
    let input: ReplaceRow = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => return error(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    if input.id != id {
        return error(
            StatusCode::BAD_REQUEST,
            "Payload values do not match URL in primary key column(s)",
        );
    }

    let row = Row {
        id,
        text: input.text,
        completed: input.completed,
    };
    // A PUT filtered on the primary key is an upsert.
    let mut table = upstream.table.write().await;
    match table.rows.iter_mut().find(|existing| existing.id == id) {
        Some(existing) => *existing = row.clone(),
        None => {
            tracing::debug!(id, "upserted missing row");
            table.last_id = table.last_id.max(id);
            table.rows.push(row.clone());
        }
    }
    written(StatusCode::OK, upstream.wants_rows(&headers), vec![row])
}

async fn delete_rows(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let id = match id_filter(&params) {
        Ok(Some(id)) => id,
        Ok(None) => return error(StatusCode::BAD_REQUEST, "DELETE requires an id filter"),
        Err(response) => return response,
    };
    let mut table = upstream.table.write().await;
    let (removed, kept): (Vec<Row>, Vec<Row>) = std::mem::take(&mut table.rows)
        .into_iter()
        .partition(|row| row.id == id);
    table.rows = kept;
    written(StatusCode::OK, upstream.wants_rows(&headers), removed)
}

/// Parse an optional `id=eq.<n>` filter.
fn id_filter(params: &HashMap<String, String>) -> Result<Option<i64>, Response> {
    let Some(raw) = params.get("id") else {
        return Ok(None);
    };
    raw.strip_prefix("eq.")
        .and_then(|value| value.parse().ok())
        .map(Some)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, &format!("unsupported filter id={raw}")))
}

fn written(status: StatusCode, echo: bool, rows: Vec<Row>) -> Response {
    if echo {
        (status, Json(rows)).into_response()
    } else if status == StatusCode::CREATED {
        status.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
