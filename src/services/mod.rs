//! Business logic services.

pub mod auth;
pub mod challenges;
pub mod dashboard;
pub mod footprint;
pub mod habit;
pub mod rewards;
pub mod user;
