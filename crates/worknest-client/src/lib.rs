//! Client core for WorkNest dashboards.
//!
//! A pure fetch layer ([`api`]) returning typed results, a pure render layer
//! ([`render`]) producing escaped HTML, and view-controllers that glue the two
//! together against a [`Document`] and a [`PageHost`].

pub mod api;
pub mod controller;
pub mod document;
pub mod error;
pub mod filter;
pub mod host;
pub mod render;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use document::Document;
pub use error::ClientError;
pub use filter::TaskFilter;
pub use host::PageHost;
pub use session::SessionManager;
pub use storage::{FileStorage, MemoryStorage, Storage};
