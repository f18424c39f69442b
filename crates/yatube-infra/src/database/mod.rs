//! PostgreSQL storage via SeaORM.

mod connections;
mod postgres_base;
mod postgres_repo;
mod schema;

pub mod entity;

pub use connections::{DatabaseConfig, connect};
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{
    PostgresCommentRepository, PostgresFollowRepository, PostgresGroupRepository,
    PostgresPostRepository, PostgresUserRepository, postgres_repositories,
};
pub use schema::{UNIQUE_MEMBERS, create_schema};

#[cfg(test)]
mod tests;
