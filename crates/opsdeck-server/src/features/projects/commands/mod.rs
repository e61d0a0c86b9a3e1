pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateProjectCommand, CreateProjectError};
pub use delete::{DeleteProjectError, DeleteProjectResponse};
pub use update::{UpdateProjectCommand, UpdateProjectError};
