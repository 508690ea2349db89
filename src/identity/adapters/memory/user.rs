//! In-memory user repository.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{EmailAddress, EmployeeId, Role, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
///
/// Users are returned in registration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    order: Vec<UserId>,
    email_index: HashMap<EmailAddress, UserId>,
    employee_index: HashMap<EmployeeId, UserId>,
}

impl InMemoryUserState {
    fn ordered(&self) -> impl Iterator<Item = &User> {
        self.order.iter().filter_map(|id| self.users.get(id))
    }
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        if state.email_index.contains_key(user.email()) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }
        if let Some(employee_id) = user.employee_id() {
            if state.employee_index.contains_key(employee_id) {
                return Err(UserRepositoryError::DuplicateEmployeeId(employee_id.clone()));
            }
            state.employee_index.insert(employee_id.clone(), user.id());
        }

        state.email_index.insert(user.email().clone(), user.id());
        state.order.push(user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let previous_email = state
            .users
            .get(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?
            .email()
            .clone();

        if previous_email != *user.email() {
            if state.email_index.contains_key(user.email()) {
                return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
            }
            state.email_index.remove(&previous_email);
            state.email_index.insert(user.email().clone(), user.id());
        }

        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .users
            .remove(&id)
            .ok_or(UserRepositoryError::NotFound(id))?;
        state.email_index.remove(removed.email());
        if let Some(employee_id) = removed.employee_id() {
            state.employee_index.remove(employee_id);
        }
        state.order.retain(|existing| *existing != id);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_employees(&self, ids: &[EmployeeId]) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        let wanted: HashSet<&EmployeeId> = ids.iter().collect();
        Ok(state
            .ordered()
            .filter(|user| user.role() == Role::Employee)
            .filter(|user| user.employee_id().is_some_and(|id| wanted.contains(id)))
            .cloned()
            .collect())
    }

    async fn find_by_role_in(&self, roles: &[Role]) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered()
            .filter(|user| roles.contains(&user.role()))
            .cloned()
            .collect())
    }

    async fn count_by_role(&self, role: Role) -> UserRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = state.users.values().filter(|user| user.role() == role).count();
        u64::try_from(count).map_err(UserRepositoryError::persistence)
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.ordered().cloned().collect())
    }
}
