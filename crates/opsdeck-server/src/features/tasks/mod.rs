pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::tasks_routes;
pub use types::{Task, TaskComment};
