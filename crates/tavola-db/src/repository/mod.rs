//! # Repository Module
//!
//! Database repository implementations for Tavola POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP Handler / Service                                                │
//! │       │                                                                 │
//! │       │  db.orders().create_order(&new_order)                          │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create_order(&self, order)   one transaction                      │
//! │  ├── list_recent(&self, limit)                                         │
//! │  └── get_detail(&self, id)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Staff accounts (credential store)
//! - [`CatalogRepository`](catalog::CatalogRepository) - Categories and menu items
//! - [`OrderRepository`](order::OrderRepository) - Orders and order lines

pub mod catalog;
pub mod order;
pub mod user;
