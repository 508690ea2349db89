//! When steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use rstest_bdd_macros::when;
use tasklane::task::services::{CreateTasksRequest, UpdateTaskRequest};

#[when(r#""{name}" assigns "{title}" to "{employee_ids}""#)]
fn assigns(
    world: &mut LifecycleWorld,
    name: String,
    title: String,
    employee_ids: String,
) -> Result<(), eyre::Report> {
    let caller = world.caller(&name)?;
    let ids: Vec<String> = employee_ids
        .split(',')
        .map(|id| id.trim().to_owned())
        .collect();
    let request = CreateTasksRequest::new(title, "", "Medium", "Pending").assign_to(ids);
    let result = run_async(world.app.lifecycle.create_tasks(caller, request));
    if let Some(created) = world.record(result) {
        world.task = created.into_iter().next();
    }
    Ok(())
}

#[when(r#""{name}" completes the task"#)]
fn completes(world: &mut LifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let caller = world.caller(&name)?;
    let task_id = world.current_task()?.id();
    let result = run_async(world.app.lifecycle.complete_task(caller, task_id));
    world.record(result);
    Ok(())
}

#[when(r#""{name}" sets the task status to "{status}""#)]
fn sets_status(
    world: &mut LifecycleWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let caller = world.caller(&name)?;
    let task_id = world.current_task()?.id();
    let result = run_async(world.app.lifecycle.update_task(
        caller,
        task_id,
        UpdateTaskRequest::status(status),
    ));
    world.record(result);
    Ok(())
}

#[when(r#""{name}" marks the task overdue"#)]
fn marks_overdue(world: &mut LifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let caller = world.caller(&name)?;
    let task_id = world.current_task()?.id();
    let result = run_async(world.app.lifecycle.mark_overdue(caller, task_id));
    world.record(result);
    Ok(())
}
