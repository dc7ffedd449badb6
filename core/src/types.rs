//! Domain DTOs for the todo service.
//!
//! # Design
//! `Todo` is both the stored record and the inbound payload shape. Missing
//! fields decode to their zero values so a body like `{"text":"x"}` is a
//! valid create request; wrong types and malformed JSON are still rejected.
//! `NewTodo` is what goes over the wire to the upstream on create, where the
//! id is left for the datastore to assign.

use serde::{Deserialize, Serialize};

/// Text of the record every in-memory store starts with.
pub const SEED_TEXT: &str = "Start with this todo";

/// A single todo item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(id: i64, text: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            text: text.into(),
            completed,
        }
    }
}

/// Payload for creating a todo in the remote datastore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl From<&Todo> for NewTodo {
    fn from(todo: &Todo) -> Self {
        Self {
            text: todo.text.clone(),
            completed: todo.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_wire_field_names() {
        let todo = Todo::new(7, "Test", true);
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "text": "Test", "completed": true}));
    }

    #[test]
    fn todo_missing_fields_decode_to_zero_values() {
        let todo: Todo = serde_json::from_str(r#"{"text":"only text"}"#).unwrap();
        assert_eq!(todo, Todo::new(0, "only text", false));

        let todo: Todo = serde_json::from_str("{}").unwrap();
        assert_eq!(todo, Todo::default());
    }

    #[test]
    fn todo_ignores_unknown_fields() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":3,"text":"a","completed":false,"created_at":"now"}"#)
                .unwrap();
        assert_eq!(todo.id, 3);
    }

    #[test]
    fn todo_rejects_wrong_types() {
        assert!(serde_json::from_str::<Todo>(r#"{"text":5}"#).is_err());
        assert!(serde_json::from_str::<Todo>(r#"{"completed":"yes"}"#).is_err());
        assert!(serde_json::from_str::<Todo>(r#"{"id":"abc"}"#).is_err());
    }

    #[test]
    fn new_todo_omits_id() {
        let todo = Todo::new(42, "buy milk", false);
        let json = serde_json::to_value(NewTodo::from(&todo)).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["text"], "buy milk");
    }
}
