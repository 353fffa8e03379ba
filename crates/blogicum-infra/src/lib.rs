//! # Blogicum Infrastructure
//!
//! Concrete implementations of the ports defined in `blogicum-core`:
//! the SeaORM/PostgreSQL entity store, a full in-memory store (fallback
//! when no database is configured, and the test double for the domain
//! services), plus JWT tokens and Argon2 password hashing.

pub mod auth;
pub mod database;
pub mod memory;

pub use auth::{Argon2PasswordService, JwtTokenService};
pub use database::DatabaseConfig;
pub use memory::MemoryStore;
