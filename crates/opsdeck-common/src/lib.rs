//! Opsdeck Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Opsdeck workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all Opsdeck workspace
//! members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Tracing subscriber setup with console/file output
//! - **Types**: Shared domain vocabulary (roles, statuses, priorities)
//!
//! # Example
//!
//! ```no_run
//! use opsdeck_common::types::MembershipRole;
//!
//! let role: MembershipRole = "admin".parse().unwrap();
//! assert!(role.is_privileged());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{OpsdeckError, Result};
