//! Service layer.
//!
//! Services hold the logic behind the HTTP handlers and are constructed
//! once at startup with their configuration passed in explicitly.

pub mod auth_service;
pub mod health_service;
pub mod order_service;
