//! In-memory identity adapters for tests and local runs.

mod allocator;
mod user;

pub use allocator::InMemoryEmployeeIdAllocator;
pub use user::InMemoryUserRepository;
