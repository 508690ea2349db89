//! Notification subjects and bodies for task lifecycle events.

use crate::identity::domain::{EmailAddress, EmployeeId, Username};
use crate::notification::domain::{NotificationMeta, NotificationRequest};
use crate::task::domain::{Task, TaskStatus};
use minijinja::{Environment, context};
use thiserror::Error;

const ASSIGNED_BODY: &str = "You have been assigned a new task: {{ title }}
Deadline: {% if deadline %}{{ deadline }}{% else %}not set{% endif %}";

const STATUS_BODY: &str = "Employee ID: {{ employee_id }}
Name: {{ username }}
Task: {{ title }}
Status: {{ status }}";

const SUBMITTED_BODY: &str = "Employee ID: {{ employee_id }}
Name: {{ username }}
Task '{{ title }}' has been submitted (Done).";

const COMPLETED_BODY: &str = "You have completed: {{ title }}!";

const OVERDUE_BODY: &str = "Task '{{ title }}' assigned to Employee ID: {{ employee_id }} \
was not completed before the deadline.";

/// Error raised when a message template cannot be rendered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render {subject} notification: {reason}")]
pub struct MessageRenderError {
    /// Subject of the notification being rendered.
    pub subject: String,
    /// Renderer diagnostic.
    pub reason: String,
}

/// The employee behind a status change.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    /// Employee identifier.
    pub employee_id: &'a EmployeeId,
    /// Display name.
    pub username: &'a Username,
}

/// Renders task lifecycle notifications.
#[derive(Debug)]
pub struct MessageCatalog {
    environment: Environment<'static>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCatalog {
    /// Creates a catalogue with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }

    /// "New Task Assigned" notice for the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRenderError`] when rendering fails.
    pub fn assigned(
        &self,
        recipient: EmailAddress,
        task: &Task,
    ) -> Result<NotificationRequest, MessageRenderError> {
        let subject = "New Task Assigned";
        let body = self.render(
            subject,
            ASSIGNED_BODY,
            context! {
                title => task.title().as_str(),
                deadline => task.deadline().map(|deadline| deadline.to_string()),
            },
        )?;
        let meta = NotificationMeta::with_status("Assigned")
            .title(task.title().as_str())
            .task_id(task.id())
            .employee_id(task.assigned_to());
        Ok(NotificationRequest::new(recipient, subject, body).with_meta(meta))
    }

    /// "Task {status} Notification" for a supervisor after an employee
    /// status change.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRenderError`] when rendering fails.
    pub fn status_changed(
        &self,
        recipient: EmailAddress,
        task: &Task,
        status: TaskStatus,
        actor: Actor<'_>,
    ) -> Result<NotificationRequest, MessageRenderError> {
        let subject = format!("Task {status} Notification");
        let body = self.render(
            &subject,
            STATUS_BODY,
            context! {
                employee_id => actor.employee_id.as_str(),
                username => actor.username.as_str(),
                title => task.title().as_str(),
                status => status.as_str(),
            },
        )?;
        let meta = actor_meta(status, task, actor);
        Ok(NotificationRequest::new(recipient, subject, body).with_meta(meta))
    }

    /// "Task Submitted (Done)" for a supervisor after completion.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRenderError`] when rendering fails.
    pub fn submitted(
        &self,
        recipient: EmailAddress,
        task: &Task,
        actor: Actor<'_>,
    ) -> Result<NotificationRequest, MessageRenderError> {
        let subject = "Task Submitted (Done)";
        let body = self.render(
            subject,
            SUBMITTED_BODY,
            context! {
                employee_id => actor.employee_id.as_str(),
                username => actor.username.as_str(),
                title => task.title().as_str(),
            },
        )?;
        let meta = actor_meta(TaskStatus::Done, task, actor);
        Ok(NotificationRequest::new(recipient, subject, body).with_meta(meta))
    }

    /// "Task Completed" confirmation for the completing employee.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRenderError`] when rendering fails.
    pub fn completed(
        &self,
        recipient: EmailAddress,
        task: &Task,
        actor: Actor<'_>,
    ) -> Result<NotificationRequest, MessageRenderError> {
        let subject = "Task Completed";
        let body = self.render(
            subject,
            COMPLETED_BODY,
            context! { title => task.title().as_str() },
        )?;
        let meta = actor_meta(TaskStatus::Done, task, actor);
        Ok(NotificationRequest::new(recipient, subject, body).with_meta(meta))
    }

    /// "Task Overdue Alert" for a supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRenderError`] when rendering fails.
    pub fn overdue(
        &self,
        recipient: EmailAddress,
        task: &Task,
    ) -> Result<NotificationRequest, MessageRenderError> {
        let subject = "Task Overdue Alert";
        let body = self.render(
            subject,
            OVERDUE_BODY,
            context! {
                title => task.title().as_str(),
                employee_id => task.assigned_to().as_str(),
            },
        )?;
        let meta = NotificationMeta::with_status(TaskStatus::Overdue.as_str())
            .task_id(task.id())
            .title(task.title().as_str())
            .employee_id(task.assigned_to());
        Ok(NotificationRequest::new(recipient, subject, body).with_meta(meta))
    }

    fn render(
        &self,
        subject: &str,
        template: &str,
        context: minijinja::Value,
    ) -> Result<String, MessageRenderError> {
        self.environment
            .render_str(template, context)
            .map_err(|error| MessageRenderError {
                subject: subject.to_owned(),
                reason: error.to_string(),
            })
    }
}

fn actor_meta(status: TaskStatus, task: &Task, actor: Actor<'_>) -> NotificationMeta {
    NotificationMeta::with_status(status.as_str())
        .task_id(task.id())
        .title(task.title().as_str())
        .employee_id(actor.employee_id)
        .username(actor.username)
}
