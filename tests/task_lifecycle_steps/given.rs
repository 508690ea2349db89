//! Given steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasklane::identity::domain::Role;
use tasklane::task::services::CreateTasksRequest;

fn enrol(world: &mut LifecycleWorld, name: String, role: Role) -> Result<(), eyre::Report> {
    let user = run_async(world.app.enrol(&name, role)).wrap_err("enrol scenario user")?;
    let caller = run_async(world.app.sign_in(&user)).wrap_err("sign in scenario user")?;
    world.callers.insert(name, caller);
    Ok(())
}

#[given(r#"an admin named "{name}""#)]
fn admin_named(world: &mut LifecycleWorld, name: String) -> Result<(), eyre::Report> {
    enrol(world, name, Role::Admin)
}

#[given(r#"a manager named "{name}""#)]
fn manager_named(world: &mut LifecycleWorld, name: String) -> Result<(), eyre::Report> {
    enrol(world, name, Role::Manager)
}

#[given(r#"an employee named "{name}""#)]
fn employee_named(world: &mut LifecycleWorld, name: String) -> Result<(), eyre::Report> {
    enrol(world, name, Role::Employee)
}

#[given(r#""{supervisor}" has assigned "{title}" to "{employee_id}" with status "{status}""#)]
fn task_assigned(
    world: &mut LifecycleWorld,
    supervisor: String,
    title: String,
    employee_id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let caller = world.caller(&supervisor)?;
    let request =
        CreateTasksRequest::new(title, "", "High", status).assign_to([employee_id]);
    let created = run_async(world.app.lifecycle.create_tasks(caller, request))
        .wrap_err("create task in scenario setup")?;
    world.task = created.into_iter().next();
    Ok(())
}
