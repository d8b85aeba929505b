//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create / update DTOs consumed by the repository layer

pub mod item;
pub mod session;
pub mod user;
