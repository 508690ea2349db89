//! Atomic-counter employee identifier allocator.

use crate::identity::{domain::EmployeeId, ports::EmployeeIdAllocator, ports::UserRepositoryResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local allocator backed by an atomic counter.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeIdAllocator {
    last_issued: AtomicU64,
}

impl InMemoryEmployeeIdAllocator {
    /// Creates an allocator whose first identifier is `EMP001`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator continuing after `last_issued`, e.g. the number
    /// of employees already present when seeding from storage.
    #[must_use]
    pub const fn starting_after(last_issued: u64) -> Self {
        Self {
            last_issued: AtomicU64::new(last_issued),
        }
    }
}

#[async_trait]
impl EmployeeIdAllocator for InMemoryEmployeeIdAllocator {
    async fn allocate(&self) -> UserRepositoryResult<EmployeeId> {
        let sequence = self.last_issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(EmployeeId::from_sequence(sequence))
    }
}
