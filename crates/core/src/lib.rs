//! Domain logic for the household stock service.
//!
//! Everything in this crate is free of database and HTTP dependencies so it
//! can be shared by the repository layer, the API server, and clients that
//! reconcile optimistic updates.

pub mod error;
pub mod limits;
pub mod messages;
pub mod scope;
pub mod snapshot;
pub mod status;
pub mod types;
pub mod view;
