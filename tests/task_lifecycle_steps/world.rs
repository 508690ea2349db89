//! Shared world state for task lifecycle BDD scenarios.

use crate::helpers::App;
use rstest::fixture;
use std::collections::HashMap;
use tasklane::api::ResponseStatus;
use tasklane::identity::domain::UserId;
use tasklane::notification::services::DeliveryMode;
use tasklane::task::domain::Task;

/// Scenario world for task lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub app: App,
    pub callers: HashMap<String, UserId>,
    pub task: Option<Task>,
    pub refusal: Option<(u16, String)>,
}

impl LifecycleWorld {
    /// Creates a world over freshly wired in-memory services.
    ///
    /// # Panics
    ///
    /// Panics if the services cannot be wired.
    #[must_use]
    pub fn new() -> Self {
        let app = App::new(DeliveryMode::Inline)
            .unwrap_or_else(|err| panic!("scenario app should wire: {err}"));
        Self {
            app,
            callers: HashMap::new(),
            task: None,
            refusal: None,
        }
    }

    /// Looks up a signed-in caller by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if no user with that name was set up.
    pub fn caller(&self, name: &str) -> Result<UserId, eyre::Report> {
        self.callers
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no user named {name} in scenario world"))
    }

    /// Returns the task the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Stores a service outcome, remembering refusals for later steps.
    pub fn record<T, E: ResponseStatus>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.refusal = Some((err.status_code(), err.client_message()));
                None
            }
        }
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
