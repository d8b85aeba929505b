//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the `session_id` cookie to a user.
//! - [`rbac::RequireAdmin`] -- Requires an administrator.

pub mod auth;
pub mod rbac;
