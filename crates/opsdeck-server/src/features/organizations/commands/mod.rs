pub mod add_member;
pub mod create;
pub mod remove_member;

pub use add_member::{AddMemberCommand, AddMemberError};
pub use create::{CreateOrganizationCommand, CreateOrganizationError, CreateOrganizationResponse};
pub use remove_member::{RemoveMemberCommand, RemoveMemberError, RemoveMemberResponse};
