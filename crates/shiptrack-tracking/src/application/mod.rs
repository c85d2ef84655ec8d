//! Application layer: handlers that validate, consult the repository, and
//! shape results.

pub mod command_handlers;
pub mod pagination;
pub mod query_handlers;
