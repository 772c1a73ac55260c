//! Single-Lambda CRUD API for a todo list.
//!
//! Request routing, validation, and envelope formatting live here; the
//! backing document store sits behind [`store::TodoStore`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod router;
pub mod store;
