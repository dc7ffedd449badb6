use async_trait::async_trait;
use todo_core::{HttpMethod, HttpRequest, HttpResponse, NewTodo, RestClient, StoreError, Todo};

use super::TodoStore;

/// Store backed by the remote datastore. `RestClient` decides what goes on
/// the wire; this type only carries requests over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: RestClient,
    http: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: RestClient::new(base_url, api_key),
            http: reqwest::Client::new(),
        }
    }

    /// The row with `id`, or `NotFound`.
    async fn fetch(&self, id: i64) -> Result<Todo, StoreError> {
        let response = self.execute(self.client.build_fetch_todo(id)).await?;
        self.client
            .parse_fetch_todo(response)?
            .ok_or(StoreError::NotFound)
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, StoreError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.http.request(method, &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(method = %req.method, url = %req.url, error = %e, "upstream request failed");
            StoreError::Transport(e.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        tracing::debug!(method = %req.method, url = %req.url, status, "upstream responded");

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl TodoStore for RemoteStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let response = self.execute(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    async fn create(&self, text: String, completed: bool) -> Result<Todo, StoreError> {
        let req = self.client.build_create_todo(&NewTodo { text, completed })?;
        let response = self.execute(req).await?;
        self.client.parse_create_todo(response)
    }

    // The datastore upserts on PUT, so a missing id is caught by reading
    // first. Not atomic, like toggle.
    async fn update(&self, id: i64, text: String, completed: bool) -> Result<Todo, StoreError> {
        self.fetch(id).await?;
        let todo = Todo { id, text, completed };
        let response = self.execute(self.client.build_update_todo(&todo)?).await?;
        self.client.parse_update_todo(response, &todo)
    }

    // Fetch, flip, write back. Not atomic: a write landing between the two
    // requests is overwritten.
    async fn toggle(&self, id: i64) -> Result<Todo, StoreError> {
        let mut todo = self.fetch(id).await?;
        todo.completed = !todo.completed;

        let response = self.execute(self.client.build_update_todo(&todo)?).await?;
        self.client.parse_update_todo(response, &todo)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let response = self.execute(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }
}
