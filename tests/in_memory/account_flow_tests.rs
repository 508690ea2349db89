//! Account flows feeding caller identity into the task lifecycle.

use super::helpers::{App, app};
use std::collections::HashSet;
use std::sync::Arc;
use tasklane::api::{ResponseStatus, error_response};
use tasklane::identity::{
    domain::Role,
    ports::UserRepository,
    services::{RegisterUserRequest, SessionError},
};
use tasklane::notification::services::DeliveryMode;
use tasklane::task::services::CreateTasksRequest;

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verified_employee_reaches_their_tasks(app: App) -> Result<(), eyre::Report> {
    let manager = app.enrol("Max", Role::Manager).await?;
    let employee = app.enrol("Ada", Role::Employee).await?;
    let manager_id = app.sign_in(&manager).await?;
    let employee_id = app.sign_in(&employee).await?;

    let created = app
        .lifecycle
        .create_tasks(
            manager_id,
            CreateTasksRequest::new("Audit", "Ledger", "High", "Pending").assign_to(["EMP001"]),
        )
        .await?;
    let visible = app.lifecycle.list_tasks(employee_id).await?;

    assert_eq!(employee.employee_id().map(|id| id.as_str()), Some("EMP001"));
    assert_eq!(visible, created);
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unverified_users_cannot_sign_in(app: App) -> Result<(), eyre::Report> {
    app.accounts
        .register(RegisterUserRequest::new("Ada", "ada@example.com", "s3cret"))
        .await?;

    let result = app.sessions.login("ada@example.com", "s3cret").await;

    let Err(err) = result else {
        return Err(eyre::eyre!("unverified login should fail"));
    };
    assert!(matches!(err, SessionError::NotVerified));
    let response = error_response(&err);
    assert_eq!(response.status, 403);
    assert_eq!(response.body.msg, "Please verify your email before logging in");
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_code_can_be_replaced(app: App) -> Result<(), eyre::Report> {
    let user = app
        .accounts
        .register(RegisterUserRequest::new("Ada", "ada@example.com", "s3cret"))
        .await?;
    let stale = user
        .verification()
        .map(|pending| pending.code().as_str().to_owned())
        .ok_or_else(|| eyre::eyre!("pending code expected"))?;
    app.clock.advance(chrono::Duration::minutes(11));

    let expired = app.accounts.verify_email("ada@example.com", &stale).await;
    app.accounts.resend_code("ada@example.com").await?;
    let refreshed = app
        .users
        .find_by_id(user.id())
        .await?
        .and_then(|stored| stored.verification().map(|p| p.code().as_str().to_owned()))
        .ok_or_else(|| eyre::eyre!("fresh code expected"))?;
    let verified = app.accounts.verify_email("ada@example.com", &refreshed).await?;

    let Err(err) = expired else {
        return Err(eyre::eyre!("stale code should expire"));
    };
    assert_eq!(err.client_message(), "Code expired");
    assert!(verified.is_verified());
    let subjects: Vec<String> = app
        .mailer
        .delivered()?
        .into_iter()
        .map(|mail| mail.subject)
        .collect();
    assert_eq!(subjects, vec!["Email Verification", "Email Verification"]);
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_registrations_get_distinct_employee_ids() -> Result<(), eyre::Report> {
    let app = Arc::new(App::new(DeliveryMode::Inline)?);
    let mut handles = Vec::new();
    for index in 0..20 {
        let shared = Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            shared
                .accounts
                .register(RegisterUserRequest::new(
                    format!("Worker {index}"),
                    format!("worker{index}@example.com"),
                    "s3cret",
                ))
                .await
        }));
    }

    let mut issued = HashSet::new();
    for handle in handles {
        let user = handle.await??;
        let employee_id = user
            .employee_id()
            .ok_or_else(|| eyre::eyre!("employees carry an id"))?;
        issued.insert(employee_id.as_str().to_owned());
    }

    assert_eq!(issued.len(), 20);
    assert_eq!(app.users.count_by_role(Role::Employee).await?, 20);
    Ok(())
}

#[rstest::rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_users_lose_access(app: App) -> Result<(), eyre::Report> {
    let manager = app.enrol("Max", Role::Manager).await?;
    let outcome = app.sessions.login("max@example.com", "s3cret").await?;
    app.users.delete(manager.id()).await?;

    let result = app.sessions.resolve_caller(&outcome.token).await;
    let tasks = app.lifecycle.list_tasks(manager.id()).await;

    let Err(session_err) = result else {
        return Err(eyre::eyre!("deleted subject should not resolve"));
    };
    let Err(task_err) = tasks else {
        return Err(eyre::eyre!("deleted caller should not list tasks"));
    };
    assert_eq!(session_err.status_code(), 401);
    assert_eq!(task_err.status_code(), 401);
    Ok(())
}
