//! End-to-end task lifecycle behaviour over in-memory adapters.

use super::helpers::{App, app};
use tasklane::api::{self, ApiResponse, MessageBody};
use mockable::Clock;
use tasklane::identity::{
    domain::{Role, User, UserId},
    ports::UserRepository,
};
use tasklane::notification::ports::NotificationRepository;
use tasklane::task::{
    domain::{Task, TaskStatus},
    ports::TaskRepository,
    services::{CreateTasksRequest, UpdateTaskRequest},
};

struct Staff {
    admin: UserId,
    manager: UserId,
    employees: Vec<(UserId, User)>,
}

async fn staff(app: &App, employee_count: usize) -> Result<Staff, eyre::Report> {
    let admin = app.enrol("Ann", Role::Admin).await?;
    let manager = app.enrol("Max", Role::Manager).await?;
    let mut employees = Vec::with_capacity(employee_count);
    for index in 0..employee_count {
        let employee = app.enrol(&format!("Emp{index}"), Role::Employee).await?;
        employees.push((app.sign_in(&employee).await?, employee));
    }
    Ok(Staff {
        admin: app.sign_in(&admin).await?,
        manager: app.sign_in(&manager).await?,
        employees,
    })
}

fn employee(staff: &Staff, index: usize) -> Result<UserId, eyre::Report> {
    staff
        .employees
        .get(index)
        .map(|(id, _)| *id)
        .ok_or_else(|| eyre::eyre!("employee {index} missing"))
}

async fn single_task(app: &App, staff: &Staff, status: &str) -> Result<Task, eyre::Report> {
    app.lifecycle
        .create_tasks(
            staff.manager,
            CreateTasksRequest::new("Audit", "Ledger", "High", status).assign_to(["EMP001"]),
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("one task expected"))
}

async fn notification_count(app: &App) -> Result<usize, eyre::Report> {
    Ok(app.notifications.list_all().await?.len())
}

#[rstest::rstest]
#[case(1)]
#[case(3)]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_assignment_creates_one_task_and_notice_per_employee(
    app: App,
    #[case] count: usize,
) -> Result<(), eyre::Report> {
    let staff = staff(&app, count).await?;
    let before = notification_count(&app).await?;
    let ids: Vec<String> = (1..=count).map(|n| format!("EMP{n:03}")).collect();

    let created = app
        .lifecycle
        .create_tasks(
            staff.admin,
            CreateTasksRequest::new("Survey", "", "Low", "Pending").assign_to(ids),
        )
        .await?;
    let response = api::tasks_created(&created);
    let notices: Vec<_> = app
        .notifications
        .list_all()
        .await?
        .into_iter()
        .skip(before)
        .collect();

    assert_eq!(created.len(), count);
    assert_eq!(response.status, 201);
    assert_eq!(response.body.task_ids.len(), count);
    assert_eq!(notices.len(), count);
    let mut recipients: Vec<&str> = notices
        .iter()
        .map(|n| n.recipient().as_str())
        .collect();
    recipients.sort_unstable();
    recipients.dedup();
    assert_eq!(recipients.len(), count);
    assert!(notices.iter().all(|n| n.subject() == "New Task Assigned"));
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_round_trips(app: App) -> Result<(), eyre::Report> {
    let staff = staff(&app, 1).await?;

    let created = app
        .lifecycle
        .create_tasks(
            staff.manager,
            CreateTasksRequest::new("Audit", "Check the ledger", "High", "Pending")
                .assign_to(["EMP001"])
                .with_deadline("2025-01-01"),
        )
        .await?;
    let task = created.first().ok_or_else(|| eyre::eyre!("task expected"))?;
    let fetched = app.lifecycle.get_task(employee(&staff, 0)?, task.id()).await?;

    assert_eq!(&fetched, task);
    assert_eq!(fetched.title().as_str(), "Audit");
    assert_eq!(fetched.description(), "Check the ledger");
    assert_eq!(fetched.assigned_to().as_str(), "EMP001");
    assert_eq!(fetched.priority().as_str(), "High");
    assert_eq!(fetched.status(), TaskStatus::Pending);
    assert_eq!(fetched.deadline().map(|d| d.to_string()), Some("2025-01-01".to_owned()));
    assert_eq!(fetched.created_by().as_str(), "Max");
    assert_eq!(fetched.created_at(), app.clock.utc());
    let (_, assignee) = staff
        .employees
        .first()
        .ok_or_else(|| eyre::eyre!("employee expected"))?;
    let inbox = app.dispatcher.inbox(assignee.email()).await?;
    assert_eq!(inbox.len(), 1);
    Ok(())
}

#[rstest::rstest]
#[case("Pending")]
#[case("In Progress")]
#[case("Done")]
#[case("Overdue")]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_tasks_reject_every_employee_status(
    app: App,
    #[case] requested: &str,
) -> Result<(), eyre::Report> {
    let staff = staff(&app, 1).await?;
    let task = single_task(&app, &staff, "Overdue").await?;

    let result = app
        .lifecycle
        .update_task(employee(&staff, 0)?, task.id(), UpdateTaskRequest::status(requested))
        .await;

    let Err(err) = result else {
        return Err(eyre::eyre!("overdue task must stay locked"));
    };
    assert_eq!(api::error_response(&err).status, 403);
    assert_eq!(
        app.tasks.find_by_id(task.id()).await?.map(|t| t.status()),
        Some(TaskStatus::Overdue)
    );
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employees_never_touch_colleagues_tasks(app: App) -> Result<(), eyre::Report> {
    let staff = staff(&app, 2).await?;
    let task = single_task(&app, &staff, "Pending").await?;
    let colleague = employee(&staff, 1)?;

    let update = app
        .lifecycle
        .update_task(colleague, task.id(), UpdateTaskRequest::status("Done"))
        .await;
    let complete = app.lifecycle.complete_task(colleague, task.id()).await;

    for result in [update.map(|_| ()), complete.map(|_| ())] {
        let Err(err) = result else {
            return Err(eyre::eyre!("colleague access must be refused"));
        };
        assert_eq!(api::error_response(&err).status, 403);
    }
    assert_eq!(app.tasks.find_by_id(task.id()).await?, Some(task));
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_overdue_marking_sends_one_batch(app: App) -> Result<(), eyre::Report> {
    let staff = staff(&app, 1).await?;
    let task = single_task(&app, &staff, "In Progress").await?;
    let before = notification_count(&app).await?;

    let first = app.lifecycle.mark_overdue(staff.admin, task.id()).await?;
    let second = app.lifecycle.mark_overdue(employee(&staff, 0)?, task.id()).await?;

    assert_eq!(ApiResponse::<MessageBody>::from(&first).body.msg, api::OVERDUE_PROCESSED);
    assert_eq!(ApiResponse::<MessageBody>::from(&second).status, 200);
    assert_eq!(notification_count(&app).await? - before, 2);
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_notifies_every_supervisor_and_the_employee(
    app: App,
) -> Result<(), eyre::Report> {
    let staff = staff(&app, 1).await?;
    let task = single_task(&app, &staff, "Pending").await?;
    let supervisors = app.users.count_by_role(Role::Manager).await?
        + app.users.count_by_role(Role::Admin).await?;
    let before = notification_count(&app).await?;

    let done = app.lifecycle.complete_task(employee(&staff, 0)?, task.id()).await?;
    let added = notification_count(&app).await? - before;

    assert_eq!(done.status(), TaskStatus::Done);
    assert!(u64::try_from(added)? >= supervisors + 1);
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_keeps_the_audit_trail(app: App) -> Result<(), eyre::Report> {
    let staff = staff(&app, 1).await?;
    let task = single_task(&app, &staff, "Pending").await?;
    let before = notification_count(&app).await?;

    let removed = app.lifecycle.delete_task(staff.admin, task.id()).await?;
    let missing = app.lifecycle.get_task(staff.manager, task.id()).await;

    assert!(removed);
    let Err(err) = missing else {
        return Err(eyre::eyre!("deleted task should be gone"));
    };
    assert_eq!(api::error_response(&err).body.msg, "Task not found");
    assert_eq!(notification_count(&app).await?, before);
    Ok(())
}
