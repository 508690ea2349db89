//! Sequence-backed employee identifier allocator.

use crate::identity::{
    domain::EmployeeId,
    ports::{EmployeeIdAllocator, UserRepositoryError, UserRepositoryResult},
};
use crate::persistence::PgPool;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

/// Allocates employee identifiers from the `employee_id_seq` sequence.
///
/// `nextval` is atomic across sessions, so concurrent registrations never
/// receive the same number.
#[derive(Debug, Clone)]
pub struct PostgresEmployeeIdAllocator {
    pool: PgPool,
}

#[derive(QueryableByName)]
struct SequenceValue {
    #[diesel(sql_type = BigInt)]
    value: i64,
}

impl PostgresEmployeeIdAllocator {
    /// Creates a new allocator from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeIdAllocator for PostgresEmployeeIdAllocator {
    async fn allocate(&self) -> UserRepositoryResult<EmployeeId> {
        let pool = self.pool.clone();
        let sequence = tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            let next = diesel::sql_query("SELECT nextval('employee_id_seq') AS value")
                .get_result::<SequenceValue>(&mut connection)
                .map_err(UserRepositoryError::persistence)?;
            u64::try_from(next.value).map_err(UserRepositoryError::persistence)
        })
        .await
        .map_err(UserRepositoryError::persistence)??;
        Ok(EmployeeId::from_sequence(sequence))
    }
}
