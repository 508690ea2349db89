//! Detached delivery: records first, mail in the background.

use super::helpers::App;
use std::time::Duration;
use tasklane::identity::domain::{EmailAddress, Role};
use tasklane::notification::{ports::NotificationRepository, services::DeliveryMode};
use tasklane::task::services::CreateTasksRequest;

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn records_exist_before_mail_is_sent() -> Result<(), eyre::Report> {
    let app = App::new(DeliveryMode::Detached)?;
    let manager = app.enrol("Max", Role::Manager).await?;
    let employee = app.enrol("Ada", Role::Employee).await?;
    let manager_id = app.sign_in(&manager).await?;
    let employee_id = app.sign_in(&employee).await?;
    let task = app
        .lifecycle
        .create_tasks(
            manager_id,
            CreateTasksRequest::new("Audit", "", "High", "Pending").assign_to(["EMP001"]),
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("task expected"))?;
    app.dispatcher.wait_for_deliveries().await;
    app.mailer.set_latency(Duration::from_millis(200))?;
    let before = app.notifications.list_all().await?.len();

    app.lifecycle.complete_task(employee_id, task.id()).await?;
    let pending: Vec<bool> = app
        .notifications
        .list_all()
        .await?
        .iter()
        .skip(before)
        .map(|record| record.smtp_sent())
        .collect();
    app.dispatcher.wait_for_deliveries().await;
    let settled: Vec<bool> = app
        .notifications
        .list_all()
        .await?
        .iter()
        .skip(before)
        .map(|record| record.smtp_sent())
        .collect();

    assert_eq!(pending, vec![false, false]);
    assert_eq!(settled, vec![true, true]);
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_mail_leaves_the_record_unsent() -> Result<(), eyre::Report> {
    let app = App::new(DeliveryMode::Detached)?;
    let admin = app.enrol("Ann", Role::Admin).await?;
    let manager = app.enrol("Max", Role::Manager).await?;
    let employee = app.enrol("Ada", Role::Employee).await?;
    let admin_id = app.sign_in(&admin).await?;
    let employee_id = app.sign_in(&employee).await?;
    let task = app
        .lifecycle
        .create_tasks(
            admin_id,
            CreateTasksRequest::new("Audit", "", "High", "Pending").assign_to(["EMP001"]),
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("task expected"))?;
    app.mailer.reject_recipient(manager.email().clone())?;

    app.lifecycle
        .update_task(
            employee_id,
            task.id(),
            tasklane::task::services::UpdateTaskRequest::status("In Progress"),
        )
        .await?;
    app.dispatcher.wait_for_deliveries().await;

    let manager_inbox = app.dispatcher.inbox(manager.email()).await?;
    let admin_inbox = app.dispatcher.inbox(&EmailAddress::new("ann@example.com")?).await?;
    assert_eq!(manager_inbox.len(), 1);
    assert!(manager_inbox.iter().all(|record| !record.smtp_sent()));
    let admin_status: Vec<bool> = admin_inbox
        .iter()
        .filter(|record| record.subject() == "Task In Progress Notification")
        .map(|record| record.smtp_sent())
        .collect();
    assert_eq!(admin_status, vec![true]);
    Ok(())
}
