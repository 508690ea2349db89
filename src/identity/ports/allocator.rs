//! Employee identifier allocation port.

use super::UserRepositoryResult;
use crate::identity::domain::EmployeeId;
use async_trait::async_trait;

/// Hands out employee identifiers that are unique under concurrent
/// registration.
///
/// Implementations must never return the same identifier twice, even when
/// called concurrently; counting existing employees is not sufficient.
#[async_trait]
pub trait EmployeeIdAllocator: Send + Sync {
    /// Allocates the next employee identifier.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the backing sequence.
    async fn allocate(&self) -> UserRepositoryResult<EmployeeId>;
}
