pub mod api;
pub mod dates;
pub mod models;

pub use models::{Comment, DisplayStatus, Role, Task, TaskStats, TaskStatus, User};
