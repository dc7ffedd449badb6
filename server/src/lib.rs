//! HTTP service exposing CRUD over todos.
//!
//! # Overview
//! Five routes under `/todos` backed by a `TodoStore`: either an in-memory
//! list seeded with one starter todo, or a remote PostgREST datastore. The
//! store is chosen once at startup and injected as router state.
//!
//! | Method | Path                 | Success          |
//! |--------|----------------------|------------------|
//! | GET    | `/todos`             | 200, todo array  |
//! | POST   | `/todos`             | 200, created     |
//! | PUT    | `/todos/{id}`        | 200, updated     |
//! | PATCH  | `/todos/{id}/toggle` | 200, toggled     |
//! | DELETE | `/todos/{id}`        | 204, empty       |

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;

use axum::{
    middleware,
    routing::{get, patch, put},
    Router,
};
use tokio::net::TcpListener;

pub use config::{Backend, Config, ConfigError};
pub use error::AppError;
pub use store::{InMemoryStore, RemoteStore, SharedStore, TodoStore};

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route("/todos", get(api::list_todos).post(api::create_todo))
        .route("/todos/{id}", put(api::update_todo).delete(api::delete_todo))
        .route("/todos/{id}/toggle", patch(api::toggle_todo))
        .layer(middleware::from_fn(logging::log_request))
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
