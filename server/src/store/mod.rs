//! Storage backends behind the todo routes.
//!
//! Handlers only see `SharedStore`. Which implementation sits behind it is
//! decided once at startup from `Backend`.

mod memory;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use todo_core::{StoreError, Todo};

use crate::config::Backend;

pub use memory::InMemoryStore;
pub use remote::RemoteStore;

#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// All todos in store order.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    async fn create(&self, text: String, completed: bool) -> Result<Todo, StoreError>;

    /// Replace `text` and `completed` of the todo with `id`.
    async fn update(&self, id: i64, text: String, completed: bool) -> Result<Todo, StoreError>;

    /// Flip `completed` of the todo with `id`.
    async fn toggle(&self, id: i64) -> Result<Todo, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn TodoStore>;

pub fn from_backend(backend: &Backend) -> SharedStore {
    match backend {
        Backend::Memory => Arc::new(InMemoryStore::seeded()),
        Backend::Remote { base_url, api_key } => Arc::new(RemoteStore::new(base_url, api_key)),
    }
}
