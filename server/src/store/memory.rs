use std::sync::Arc;

use async_trait::async_trait;
use todo_core::{StoreError, Todo, TodoList};
use tokio::sync::RwLock;

use super::TodoStore;

/// Process-local store. One lock guards the whole list and its id counter,
/// so concurrent requests are serialized against every write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    list: Arc<RwLock<TodoList>>,
}

impl InMemoryStore {
    pub fn new(list: TodoList) -> Self {
        Self {
            list: Arc::new(RwLock::new(list)),
        }
    }

    /// A store holding the single starter todo.
    pub fn seeded() -> Self {
        let list = TodoList::seeded();
        if let Some(seed) = list.todos().first() {
            tracing::info!(id = seed.id, text = %seed.text, completed = seed.completed, "initialized in-memory store");
        }
        Self::new(list)
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.list.read().await.todos().to_vec())
    }

    async fn create(&self, text: String, completed: bool) -> Result<Todo, StoreError> {
        Ok(self.list.write().await.create(text, completed))
    }

    async fn update(&self, id: i64, text: String, completed: bool) -> Result<Todo, StoreError> {
        self.list.write().await.update(id, text, completed)
    }

    async fn toggle(&self, id: i64) -> Result<Todo, StoreError> {
        self.list.write().await.toggle(id)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.list.write().await.delete(id).map(|_| ())
    }
}
