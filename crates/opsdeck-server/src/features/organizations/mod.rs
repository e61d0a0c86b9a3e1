pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::organizations_routes;
