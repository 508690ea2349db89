//! In-memory task adapters for tests and local runs.

mod task;

pub use task::InMemoryTaskRepository;
