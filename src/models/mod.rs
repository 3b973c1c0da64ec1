//! Database models and DTOs for all domain entities.

pub mod habit;
pub mod user;
