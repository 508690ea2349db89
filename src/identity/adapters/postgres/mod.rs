//! `PostgreSQL` adapters for user persistence.

mod allocator;
mod models;
mod repository;
mod schema;

pub use allocator::PostgresEmployeeIdAllocator;
pub use repository::PostgresUserRepository;
