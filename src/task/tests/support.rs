//! Builders shared by the task unit tests.

use crate::identity::domain::{
    EmailAddress, EmployeeId, NewUser, PasswordHash, PendingVerification, Role, User, Username,
    VerificationCode,
};
use crate::task::domain::{NewTask, Task, TaskPriority, TaskStatus, TaskTitle};
use crate::test_support::FixedClock;
use eyre::Result;

pub fn user(name: &str, role: Role, employee_id: Option<&str>) -> Result<User> {
    let clock = FixedClock::default();
    let verification = PendingVerification::issue(
        VerificationCode::parse("123456")?,
        chrono::Duration::minutes(10),
        &clock,
    );
    Ok(User::register(
        NewUser {
            username: Username::new(name)?,
            email: EmailAddress::new(format!("{}@example.com", name.to_ascii_lowercase()))?,
            password_hash: PasswordHash::new("plain$pw".to_owned()),
            role,
            employee_id: employee_id.map(EmployeeId::new).transpose()?,
        },
        verification,
        &clock,
    )?)
}

pub fn task(assigned_to: &str, status: TaskStatus) -> Result<Task> {
    Ok(Task::create(
        NewTask {
            title: TaskTitle::new("Write report")?,
            description: "Quarterly numbers".to_owned(),
            assigned_to: EmployeeId::new(assigned_to)?,
            priority: TaskPriority::new("High")?,
            status,
            deadline: None,
        },
        Username::new("Max")?,
        &FixedClock::default(),
    ))
}
