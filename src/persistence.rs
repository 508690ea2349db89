//! `PostgreSQL` connection pooling shared by the diesel adapters.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type used by all diesel adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Default upper bound on pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be
/// established.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}
