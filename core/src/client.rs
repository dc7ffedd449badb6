//! Request builder and response parser for the remote todo datastore.
//!
//! # Design
//! The datastore speaks the PostgREST dialect: a single `todos` table under
//! `/rest/v1`, rows selected with `id=eq.<n>` filters, and an `apikey`
//! header on every call. `RestClient` holds only the base URL and key. Each
//! operation is a `build_*` method producing an `HttpRequest` and a
//! `parse_*` method consuming the `HttpResponse`; the caller owns the
//! network round-trip in between.
//!
//! Writes ask for `Prefer: return=representation` so the affected rows come
//! back. An empty row array on delete means the id did not exist. A PUT
//! filtered on the id is an upsert upstream, so it never reports a missing
//! row; callers that must not create rows fetch first.
//! A body that is empty or not JSON is tolerated: list decodes it to no
//! rows, create to a zero-value todo, update to the submitted record, and
//! delete to success.

use serde::Deserialize;

use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo};

/// Path of the todos table below the datastore base URL.
pub const TABLE_PATH: &str = "/rest/v1/todos";

const API_KEY_HEADER: &str = "apikey";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Stateless client for the remote todo datastore.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}?select=*", self.table_url()), None)
    }

    pub fn build_fetch_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}&select=*", self.row_url(id)), None)
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, StoreError> {
        let body = serde_json::to_string(input).map_err(|e| StoreError::Encode(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, self.table_url(), Some(body)))
    }

    /// Replace the row matching `todo.id` with `todo`, inserting it if absent.
    pub fn build_update_todo(&self, todo: &Todo) -> Result<HttpRequest, StoreError> {
        let body = serde_json::to_string(todo).map_err(|e| StoreError::Encode(e.to_string()))?;
        Ok(self.request(HttpMethod::Put, self.row_url(todo.id), Some(body)))
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.row_url(id), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, StoreError> {
        check_status(&response)?;
        Ok(decode_rows(&response.body).unwrap_or_default())
    }

    /// `None` when no row matched the filter.
    pub fn parse_fetch_todo(&self, response: HttpResponse) -> Result<Option<Todo>, StoreError> {
        check_status(&response)?;
        Ok(decode_rows(&response.body).unwrap_or_default().into_iter().next())
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, StoreError> {
        check_status(&response)?;
        let created = match serde_json::from_str::<Echo>(&response.body) {
            Ok(Echo::Rows(rows)) => rows.into_iter().next(),
            Ok(Echo::Row(row)) => Some(row),
            Err(_) => None,
        };
        Ok(created.unwrap_or_default())
    }

    /// `submitted` is returned when the upstream does not echo the row.
    pub fn parse_update_todo(
        &self,
        response: HttpResponse,
        submitted: &Todo,
    ) -> Result<Todo, StoreError> {
        check_status(&response)?;
        match decode_rows(&response.body) {
            Some(rows) => rows.into_iter().next().ok_or(StoreError::NotFound),
            None => Ok(submitted.clone()),
        }
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), StoreError> {
        check_status(&response)?;
        match decode_rows(&response.body) {
            Some(rows) if rows.is_empty() => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    fn table_url(&self) -> String {
        format!("{}{TABLE_PATH}", self.base_url)
    }

    fn row_url(&self, id: i64) -> String {
        format!("{}?id=eq.{id}", self.table_url())
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![(API_KEY_HEADER.to_string(), self.api_key.clone())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if method != HttpMethod::Get {
            headers.push(("prefer".to_string(), RETURN_REPRESENTATION.to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Echo {
    Rows(Vec<Todo>),
    Row(Todo),
}

fn decode_rows(body: &str) -> Option<Vec<Todo>> {
    serde_json::from_str(body).ok()
}

fn check_status(response: &HttpResponse) -> Result<(), StoreError> {
    if response.is_success() {
        return Ok(());
    }
    Err(StoreError::Upstream {
        status: response.status,
        body: response.body.clone(),
    })
}
