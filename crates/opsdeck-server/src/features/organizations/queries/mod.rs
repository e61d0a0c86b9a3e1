pub mod list;
pub mod members;

pub use members::MemberListItem;
