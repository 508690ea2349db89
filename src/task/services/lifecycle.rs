//! Task lifecycle orchestration: authorisation, transitions, notifications.

use super::{
    Actor, Assignees, CreateTasksRequest, Denial, MessageCatalog, MessageRenderError,
    TaskServiceError, TaskServiceResult, UpdateTaskRequest,
};
use crate::identity::{
    domain::{EmailAddress, EmployeeId, Role, User, UserId},
    ports::UserRepository,
};
use crate::notification::{domain::NotificationRequest, ports::Notifier};
use crate::task::{
    domain::{
        Access, Caller, Deadline, NewTask, PatchOutcome, StatusGuard, Task, TaskId, TaskOperation,
        TaskPatch, TaskPriority, TaskStatus, TaskTitle, TaskUpdate,
    },
    ports::TaskRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{error, info, warn};

const EMPLOYEE_BLOCKED: &[TaskStatus] = &[TaskStatus::Overdue, TaskStatus::Done];
const OVERDUE_BLOCKED: &[TaskStatus] = &[TaskStatus::Overdue];
const DONE_BLOCKED: &[TaskStatus] = &[TaskStatus::Done];

/// Result of a successful task update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A supervisor replaced task fields.
    FieldsUpdated(Task),
    /// An employee changed the status of their task.
    StatusUpdated(Task),
}

impl UpdateOutcome {
    /// Returns the task after the update.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::FieldsUpdated(task) | Self::StatusUpdated(task) => task,
        }
    }
}

/// Result of marking a task overdue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverdueOutcome {
    /// The task was already done and was left untouched.
    AlreadyDone(Task),
    /// The task is now overdue.
    Processed {
        /// Task after the update.
        task: Task,
        /// Whether supervisors were alerted, which happens only on the first
        /// transition into Overdue.
        notified: bool,
    },
}

/// Task lifecycle orchestration service.
///
/// Every operation resolves the caller from the user store, checks the
/// capability table, applies at most one guarded update, and then fires
/// notifications through the [`Notifier`].
pub struct TaskLifecycleService<T, U, N, C>
where
    T: TaskRepository,
    U: UserRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    notifier: Arc<N>,
    clock: Arc<C>,
    messages: MessageCatalog,
}

impl<T, U, N, C> TaskLifecycleService<T, U, N, C>
where
    T: TaskRepository,
    U: UserRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(tasks: Arc<T>, users: Arc<U>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            notifier,
            clock,
            messages: MessageCatalog::new(),
        }
    }

    /// Creates one task per resolved employee and notifies each assignee.
    ///
    /// Assignee identifiers that do not name an Employee-role user are
    /// dropped. Tasks are stored one at a time; a storage failure part way
    /// through leaves the earlier tasks in place.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-supervisors,
    /// [`TaskServiceError::NoValidAssignees`] when no employee resolves, and
    /// validation errors for malformed fields.
    pub async fn create_tasks(
        &self,
        caller_id: UserId,
        request: CreateTasksRequest,
    ) -> TaskServiceResult<Vec<Task>> {
        let caller = self.resolve_caller(caller_id).await?;
        if !caller.access(TaskOperation::Create).is_granted() {
            return Err(TaskServiceError::Forbidden(Denial::CreateTasks));
        }

        let title = TaskTitle::new(request.title)?;
        let priority = TaskPriority::new(request.priority)?;
        let status = TaskStatus::try_from(request.status.as_str())?;
        let deadline = request
            .deadline
            .as_deref()
            .map(Deadline::parse)
            .transpose()?;

        let employees = self.resolve_assignees(request.assignees).await?;
        if employees.is_empty() {
            return Err(TaskServiceError::NoValidAssignees);
        }

        let mut created = Vec::with_capacity(employees.len());
        for (employee_id, email) in employees {
            let task = Task::create(
                NewTask {
                    title: title.clone(),
                    description: request.description.clone(),
                    assigned_to: employee_id,
                    priority: priority.clone(),
                    status,
                    deadline,
                },
                caller.username.clone(),
                &*self.clock,
            );
            if let Err(err) = self.tasks.store(&task).await {
                warn!(
                    stored = created.len(),
                    requested = created.capacity(),
                    error = %err,
                    "bulk task creation stopped part way"
                );
                return Err(err.into());
            }
            created.push((task, email));
        }
        info!(
            created_by = %caller.username,
            count = created.len(),
            "tasks created"
        );

        for (task, email) in &created {
            self.notify(self.messages.assigned(email.clone(), task)).await;
        }
        Ok(created.into_iter().map(|(task, _)| task).collect())
    }

    /// Updates a task.
    ///
    /// Supervisors replace arbitrary fields without notification. Employees
    /// may only change the status of their own task; moving it to In
    /// Progress or Done alerts every supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for a missing task,
    /// [`TaskServiceError::Forbidden`] for ownership, Overdue or Done
    /// violations, [`TaskServiceError::NothingToUpdate`] when an employee
    /// sends no status, and [`TaskServiceError::InvalidStatus`] for unknown
    /// status values.
    pub async fn update_task(
        &self,
        caller_id: UserId,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<UpdateOutcome> {
        let caller = self.resolve_caller(caller_id).await?;
        let task = self.load_task(task_id).await?;

        if caller.access(TaskOperation::EditFields).is_granted() {
            let patch = self.supervisor_patch(request).await?;
            let outcome = self
                .apply(task_id, patch, StatusGuard::Unrestricted)
                .await?;
            let (PatchOutcome::Applied { current, .. } | PatchOutcome::Rejected { current }) =
                outcome;
            info!(task_id = %task_id, updated_by = %caller.username, "task fields updated");
            return Ok(UpdateOutcome::FieldsUpdated(current));
        }
        if !caller.access(TaskOperation::UpdateStatus).is_granted() {
            return Err(TaskServiceError::Forbidden(Denial::UpdateTasks));
        }

        if task.status() == TaskStatus::Overdue {
            return Err(TaskServiceError::Forbidden(Denial::TaskOverdue));
        }
        let Some(actor) = owning_actor(&caller, TaskOperation::UpdateStatus, &task) else {
            return Err(TaskServiceError::Forbidden(Denial::UpdateOthersTask));
        };
        let raw_status = request
            .status
            .filter(|status| !status.trim().is_empty())
            .ok_or(TaskServiceError::NothingToUpdate)?;
        let status = TaskStatus::try_from(raw_status.as_str())?;
        if task.status() == TaskStatus::Done && status != TaskStatus::Done {
            return Err(TaskServiceError::Forbidden(Denial::TaskDone));
        }

        let supervisors = if status.alerts_supervisors() {
            self.supervisors().await?
        } else {
            Vec::new()
        };
        let guard = if status == TaskStatus::Done {
            StatusGuard::Excluding(OVERDUE_BLOCKED)
        } else {
            StatusGuard::Excluding(EMPLOYEE_BLOCKED)
        };
        let updated = match self.apply(task_id, TaskPatch::status(status), guard).await? {
            PatchOutcome::Applied { current, .. } => current,
            PatchOutcome::Rejected { current } => {
                let denial = if current.status() == TaskStatus::Overdue {
                    Denial::TaskOverdue
                } else {
                    Denial::TaskDone
                };
                return Err(TaskServiceError::Forbidden(denial));
            }
        };
        info!(task_id = %task_id, status = %status, "task status updated by assignee");

        for supervisor in &supervisors {
            self.notify(self.messages.status_changed(
                supervisor.email().clone(),
                &updated,
                status,
                actor,
            ))
            .await;
        }
        Ok(UpdateOutcome::StatusUpdated(updated))
    }

    /// Marks the caller's own task as done.
    ///
    /// Alerts every supervisor and confirms to the employee. Repeated calls
    /// keep the task done and send the notifications again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-employees or when the
    /// task belongs to someone else, and [`TaskServiceError::NotFound`] for a
    /// missing task.
    pub async fn complete_task(
        &self,
        caller_id: UserId,
        task_id: TaskId,
    ) -> TaskServiceResult<Task> {
        let caller = self.resolve_caller(caller_id).await?;
        if !caller.access(TaskOperation::Complete).is_granted() {
            return Err(TaskServiceError::Forbidden(Denial::CompleteTasks));
        }
        let task = self.load_task(task_id).await?;
        let Some(actor) = owning_actor(&caller, TaskOperation::Complete, &task) else {
            return Err(TaskServiceError::Forbidden(Denial::CompleteOthersTask));
        };

        let supervisors = self.supervisors().await?;
        let (PatchOutcome::Applied { current, .. } | PatchOutcome::Rejected { current }) = self
            .apply(
                task_id,
                TaskPatch::status(TaskStatus::Done),
                StatusGuard::Unrestricted,
            )
            .await?;
        info!(task_id = %task_id, employee_id = %actor.employee_id, "task completed");

        for supervisor in &supervisors {
            self.notify(
                self.messages
                    .submitted(supervisor.email().clone(), &current, actor),
            )
            .await;
        }
        self.notify(self.messages.completed(caller.email.clone(), &current, actor))
            .await;
        Ok(current)
    }

    /// Marks a task overdue unless it is already done.
    ///
    /// Supervisors are alerted only on the transition into Overdue; marking
    /// an already overdue task again is silent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for a missing task.
    pub async fn mark_overdue(
        &self,
        caller_id: UserId,
        task_id: TaskId,
    ) -> TaskServiceResult<OverdueOutcome> {
        let caller = self.resolve_caller(caller_id).await?;
        let task = self.load_task(task_id).await?;
        if !caller.may(TaskOperation::MarkOverdue, &task) {
            return Err(TaskServiceError::Forbidden(Denial::MarkOverdue));
        }
        if task.status() == TaskStatus::Done {
            return Ok(OverdueOutcome::AlreadyDone(task));
        }

        let supervisors = self.supervisors().await?;
        let outcome = self
            .apply(
                task_id,
                TaskPatch::status(TaskStatus::Overdue),
                StatusGuard::Excluding(DONE_BLOCKED),
            )
            .await?;
        let (previous, current) = match outcome {
            PatchOutcome::Applied { previous, current } => (previous, current),
            PatchOutcome::Rejected { current } => return Ok(OverdueOutcome::AlreadyDone(current)),
        };

        let notified = previous.status() != TaskStatus::Overdue;
        if notified {
            info!(task_id = %task_id, "task marked overdue");
            for supervisor in &supervisors {
                self.notify(self.messages.overdue(supervisor.email().clone(), &current))
                    .await;
            }
        }
        Ok(OverdueOutcome::Processed {
            task: current,
            notified,
        })
    }

    /// Deletes a task, returning `true` when a record was removed.
    ///
    /// Deleting a missing task succeeds. Notification records are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-supervisors.
    pub async fn delete_task(
        &self,
        caller_id: UserId,
        task_id: TaskId,
    ) -> TaskServiceResult<bool> {
        let caller = self.resolve_caller(caller_id).await?;
        if !caller.access(TaskOperation::Delete).is_granted() {
            return Err(TaskServiceError::Forbidden(Denial::DeleteTasks));
        }
        let removed = self.tasks.delete(task_id).await?;
        info!(task_id = %task_id, removed, deleted_by = %caller.username, "task deleted");
        Ok(removed)
    }

    /// Lists the tasks visible to the caller.
    ///
    /// Employees see their own tasks; supervisors see every task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UnknownCaller`] when the caller does not
    /// resolve.
    pub async fn list_tasks(&self, caller_id: UserId) -> TaskServiceResult<Vec<Task>> {
        let caller = self.resolve_caller(caller_id).await?;
        match caller.access(TaskOperation::Read) {
            Access::Any => Ok(self.tasks.find_all().await?),
            Access::Own => match &caller.employee_id {
                Some(employee_id) => Ok(self.tasks.find_by_assignee(employee_id).await?),
                None => Ok(Vec::new()),
            },
            Access::Denied => Err(TaskServiceError::Forbidden(Denial::ReadOthersTask)),
        }
    }

    /// Fetches one task visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for a missing task and
    /// [`TaskServiceError::Forbidden`] when an employee asks for someone
    /// else's task.
    pub async fn get_task(&self, caller_id: UserId, task_id: TaskId) -> TaskServiceResult<Task> {
        let caller = self.resolve_caller(caller_id).await?;
        let task = self.load_task(task_id).await?;
        if !caller.may(TaskOperation::Read, &task) {
            return Err(TaskServiceError::Forbidden(Denial::ReadOthersTask));
        }
        Ok(task)
    }

    async fn resolve_caller(&self, id: UserId) -> TaskServiceResult<Caller> {
        self.users
            .find_by_id(id)
            .await?
            .map(|user| Caller::from_user(&user))
            .ok_or(TaskServiceError::UnknownCaller(id))
    }

    async fn load_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    async fn supervisors(&self) -> TaskServiceResult<Vec<User>> {
        Ok(self.users.find_by_role_in(&Role::SUPERVISORS).await?)
    }

    async fn resolve_assignees(
        &self,
        assignees: Assignees,
    ) -> TaskServiceResult<Vec<(EmployeeId, EmailAddress)>> {
        let employees = match assignees {
            Assignees::AllEmployees => self.users.find_by_role_in(&[Role::Employee]).await?,
            Assignees::Explicit(raw_ids) => {
                let ids: Vec<EmployeeId> = raw_ids
                    .into_iter()
                    .filter_map(|raw| EmployeeId::new(raw).ok())
                    .collect();
                if ids.is_empty() {
                    Vec::new()
                } else {
                    self.users.find_employees(&ids).await?
                }
            }
        };
        Ok(employees
            .into_iter()
            .filter_map(|user| {
                let employee_id = user.employee_id()?.clone();
                Some((employee_id, user.email().clone()))
            })
            .collect())
    }

    async fn supervisor_patch(&self, request: UpdateTaskRequest) -> TaskServiceResult<TaskPatch> {
        let assigned_to = match request.assigned_to {
            Some(raw) => {
                let employee_id =
                    EmployeeId::new(raw).map_err(|_| TaskServiceError::NoValidAssignees)?;
                let found = self
                    .users
                    .find_employees(std::slice::from_ref(&employee_id))
                    .await?;
                if found.is_empty() {
                    return Err(TaskServiceError::NoValidAssignees);
                }
                Some(employee_id)
            }
            None => None,
        };
        Ok(TaskPatch {
            title: request.title.map(TaskTitle::new).transpose()?,
            description: request.description,
            assigned_to,
            priority: request.priority.map(TaskPriority::new).transpose()?,
            status: request
                .status
                .as_deref()
                .map(TaskStatus::try_from)
                .transpose()?,
            deadline: request
                .deadline
                .as_deref()
                .map(Deadline::parse)
                .transpose()?,
        })
    }

    async fn apply(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
        guard: StatusGuard,
    ) -> TaskServiceResult<PatchOutcome> {
        let update = TaskUpdate {
            patch,
            guard,
            at: self.clock.utc(),
        };
        Ok(self.tasks.update_fields(task_id, &update).await?)
    }

    async fn notify(&self, request: Result<NotificationRequest, MessageRenderError>) {
        match request {
            Ok(notification) => self.notifier.dispatch(notification).await,
            Err(err) => error!(error = %err, "notification not rendered"),
        }
    }
}

/// Returns the acting employee when `caller` may perform `operation` on
/// their own `task`.
fn owning_actor<'a>(
    caller: &'a Caller,
    operation: TaskOperation,
    task: &Task,
) -> Option<Actor<'a>> {
    if !caller.may(operation, task) {
        return None;
    }
    caller.employee_id.as_ref().map(|employee_id| Actor {
        employee_id,
        username: &caller.username,
    })
}
