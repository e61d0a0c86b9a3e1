pub mod add_comment;
pub mod create;
pub mod delete;
pub mod delete_comment;
pub mod update;

pub use add_comment::{AddCommentCommand, AddCommentError};
pub use create::{CreateTaskCommand, CreateTaskError};
pub use delete::{DeleteTaskError, DeleteTaskResponse};
pub use delete_comment::{DeleteCommentError, DeleteCommentResponse};
pub use update::{UpdateTaskCommand, UpdateTaskError};
