//! SeaORM/PostgreSQL entity store.

mod connections;
pub mod entity;
mod postgres;

pub use connections::{DatabaseConfig, connect};
pub use postgres::{
    PostgresCategoryStore, PostgresCommentStore, PostgresLocationStore, PostgresPostStore,
    PostgresUserStore,
};

#[cfg(test)]
mod tests;
