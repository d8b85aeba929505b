//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Opaque session tokens carried in the `session_id` cookie.
//! - [`bootstrap`] -- Startup administrator account.

pub mod bootstrap;
pub mod password;
pub mod session;
