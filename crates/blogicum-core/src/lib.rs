//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog engine.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the entities, the post-visibility rules, the authorship access guard and the
//! feed assembly on top of the store ports.

pub mod access;
pub mod comments;
pub mod domain;
pub mod error;
pub mod feed;
pub mod ports;
pub mod posts;
pub mod query;
pub mod visibility;

pub use error::DomainError;
