//! Request extractors for authentication and access control.

pub mod auth;
pub mod rbac;
