//! Then steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use rstest_bdd_macros::then;
use tasklane::identity::domain::EmailAddress;
use tasklane::notification::ports::NotificationRepository;
use tasklane::task::{domain::TaskStatus, ports::TaskRepository};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.current_task()?.id();
    let stored = run_async(world.app.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from store"))?;

    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("the request is refused with status {code:u16}")]
fn refused_with(world: &LifecycleWorld, code: u16) -> Result<(), eyre::Report> {
    let (status, message) = world
        .refusal
        .as_ref()
        .ok_or_else(|| eyre::eyre!("the request was not refused"))?;
    eyre::ensure!(*status == code, "expected status {code}, got {status}: {message}");
    Ok(())
}

#[then(r#"the refusal message is "{message}""#)]
fn refusal_message(world: &LifecycleWorld, message: String) -> Result<(), eyre::Report> {
    let (_, actual) = world
        .refusal
        .as_ref()
        .ok_or_else(|| eyre::eyre!("the request was not refused"))?;
    eyre::ensure!(*actual == message, "expected message {message:?}, got {actual:?}");
    Ok(())
}

#[then("{count:usize} tasks exist")]
fn tasks_exist(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let stored = run_async(world.app.tasks.find_all())?;
    eyre::ensure!(
        stored.len() == count,
        "expected {count} tasks, found {}",
        stored.len()
    );
    Ok(())
}

#[then(r#""{email}" has received "{subject}""#)]
fn has_received(
    world: &LifecycleWorld,
    email: String,
    subject: String,
) -> Result<(), eyre::Report> {
    let recipient = EmailAddress::new(email)?;
    let inbox = run_async(world.app.dispatcher.inbox(&recipient))?;
    eyre::ensure!(
        inbox.iter().any(|record| record.subject() == subject),
        "{recipient} has no notification with subject {subject:?}"
    );
    Ok(())
}

#[then(r#"{count:usize} notifications with subject "{subject}" were recorded"#)]
fn notifications_recorded(
    world: &LifecycleWorld,
    count: usize,
    subject: String,
) -> Result<(), eyre::Report> {
    let records = run_async(world.app.notifications.list_all())?;
    let matching = records
        .iter()
        .filter(|record| record.subject() == subject)
        .count();
    eyre::ensure!(
        matching == count,
        "expected {count} {subject:?} notifications, found {matching}"
    );
    Ok(())
}
