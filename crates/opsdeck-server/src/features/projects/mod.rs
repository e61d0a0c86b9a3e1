pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::projects_routes;
pub use types::Project;
