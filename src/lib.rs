//! REST backend for a personal task list.
//!
//! Authenticated users create, read, update, and delete their own tasks. The
//! crate's core is the request-authentication layer: the token service
//! (`auth::token`), the ownership-enforcing middleware (`auth::middleware`),
//! the storage capability it gatekeeps (`store`), and the method/path
//! dispatch contract (`routes`).

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use error::{ApiError, AuthFailure};
