//! `PostgreSQL` repository implementation for user storage.

use super::{
    models::{UserRecord, UserRow},
    schema::users,
};
use crate::identity::{
    domain::{
        EmailAddress, EmployeeId, PasswordHash, PendingVerification, PersistedUserData, Role,
        User, UserId, Username, VerificationCode,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::persistence::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let record = to_record(user);
        let user_id = user.id();
        let email = user.email().clone();
        let employee_id = user.employee_id().cloned();

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                        classify_unique_violation(
                            info.as_ref(),
                            user_id,
                            &email,
                            employee_id.as_ref(),
                        )
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let record = to_record(user);
        let user_id = user.id();
        let email = user.email().clone();
        let employee_id = user.employee_id().cloned();

        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.find(user_id.into_inner()))
                .set(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                        classify_unique_violation(
                            info.as_ref(),
                            user_id,
                            &email,
                            employee_id.as_ref(),
                        )
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(users::table.find(id.into_inner()))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_employees(&self, ids: &[EmployeeId]) -> UserRepositoryResult<Vec<User>> {
        let lookup: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::role.eq(Role::Employee.as_str()))
                .filter(users::employee_id.eq_any(lookup))
                .order(users::created_at.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn find_by_role_in(&self, roles: &[Role]) -> UserRepositoryResult<Vec<User>> {
        let lookup: Vec<&'static str> = roles.iter().map(|role| role.as_str()).collect();
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::role.eq_any(lookup))
                .order(users::created_at.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn count_by_role(&self, role: Role) -> UserRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = users::table
                .filter(users::role.eq(role.as_str()))
                .count()
                .get_result(connection)
                .map_err(UserRepositoryError::persistence)?;
            u64::try_from(count).map_err(UserRepositoryError::persistence)
        })
        .await
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .order(users::created_at.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn to_record(user: &User) -> UserRecord {
    let verification = user.verification();
    UserRecord {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        password_hash: user.password_hash().as_str().to_owned(),
        role: user.role().as_str().to_owned(),
        employee_id: user.employee_id().map(|id| id.as_str().to_owned()),
        is_verified: user.is_verified(),
        verification_code: verification.map(|pending| pending.code().as_str().to_owned()),
        verification_expires_at: verification.map(PendingVerification::expires_at),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        username,
        email,
        password_hash,
        role,
        employee_id,
        is_verified,
        verification_code,
        verification_expires_at,
        created_at,
        updated_at,
    } = row;

    let verification = match (verification_code, verification_expires_at) {
        (Some(code), Some(expires_at)) => Some(PendingVerification::from_parts(
            VerificationCode::parse(&code).map_err(UserRepositoryError::persistence)?,
            expires_at,
        )),
        _ => None,
    };

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        username: Username::new(username).map_err(UserRepositoryError::persistence)?,
        email: EmailAddress::new(email).map_err(UserRepositoryError::persistence)?,
        password_hash: PasswordHash::new(password_hash),
        role: Role::try_from(role.as_str()).map_err(UserRepositoryError::persistence)?,
        employee_id: employee_id
            .map(EmployeeId::new)
            .transpose()
            .map_err(UserRepositoryError::persistence)?,
        is_verified,
        verification,
        created_at,
        updated_at,
    };
    Ok(User::from_persisted(data))
}

fn classify_unique_violation(
    info: &dyn DatabaseErrorInformation,
    user_id: UserId,
    email: &EmailAddress,
    employee_id: Option<&EmployeeId>,
) -> UserRepositoryError {
    match (info.constraint_name(), employee_id) {
        (Some("idx_users_email_unique"), _) => UserRepositoryError::DuplicateEmail(email.clone()),
        (Some("idx_users_employee_id_unique"), Some(employee_id)) => {
            UserRepositoryError::DuplicateEmployeeId(employee_id.clone())
        }
        _ => UserRepositoryError::DuplicateUser(user_id),
    }
}
