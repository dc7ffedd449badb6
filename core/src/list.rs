//! In-memory todo collection.
//!
//! An ordered `Vec` plus the last id handed out. Lookups are linear scans
//! by exact id; the first match wins. Removal preserves the order of the
//! remaining items. The collection does no locking of its own.

use crate::error::StoreError;
use crate::types::{Todo, SEED_TEXT};

#[derive(Debug, Clone, Default)]
pub struct TodoList {
    todos: Vec<Todo>,
    last_id: i64,
}

impl TodoList {
    /// An empty list whose first created todo gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding the single starter todo with id 1.
    pub fn seeded() -> Self {
        Self {
            todos: vec![Todo::new(1, SEED_TEXT, false)],
            last_id: 1,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn create(&mut self, text: String, completed: bool) -> Todo {
        self.last_id += 1;
        let todo = Todo {
            id: self.last_id,
            text,
            completed,
        };
        self.todos.push(todo.clone());
        todo
    }

    pub fn update(&mut self, id: i64, text: String, completed: bool) -> Result<Todo, StoreError> {
        let todo = self.find_mut(id)?;
        todo.text = text;
        todo.completed = completed;
        Ok(todo.clone())
    }

    pub fn toggle(&mut self, id: i64) -> Result<Todo, StoreError> {
        let todo = self.find_mut(id)?;
        todo.completed = !todo.completed;
        Ok(todo.clone())
    }

    /// Returns the removed todo.
    pub fn delete(&mut self, id: i64) -> Result<Todo, StoreError> {
        let index = self
            .todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(StoreError::NotFound)?;
        Ok(self.todos.remove(index))
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Todo, StoreError> {
        self.todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(StoreError::NotFound)
    }
}
