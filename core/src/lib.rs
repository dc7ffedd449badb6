//! I/O-free core of the todo service.
//!
//! # Overview
//! Holds everything both store backends share: the `Todo` model, the
//! `StoreError` type, the in-memory `TodoList` collection, and the
//! `RestClient` that speaks to the remote datastore by building
//! `HttpRequest` values and parsing `HttpResponse` values. The caller
//! executes the actual HTTP round-trip, so nothing here does I/O.
//!
//! # Design
//! - `RestClient` is stateless; it holds only the base URL and API key.
//! - Each remote operation is split into `build_*` and `parse_*`, keeping the
//!   I/O boundary explicit and the parsing rules unit-testable.
//! - `TodoList` carries no lock; the server wraps it in one.

pub mod client;
pub mod error;
pub mod http;
pub mod list;
pub mod types;

pub use client::RestClient;
pub use error::StoreError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::TodoList;
pub use types::{NewTodo, Todo, SEED_TEXT};
