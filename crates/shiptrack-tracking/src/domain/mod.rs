//! Domain layer: inbound request shapes and their validation rules.

pub mod commands;
pub mod queries;
pub mod validation;
