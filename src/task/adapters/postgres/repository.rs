//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{TaskRecord, TaskRow},
    schema::tasks,
};
use crate::identity::domain::{EmployeeId, Username};
use crate::persistence::PgPool;
use crate::task::{
    domain::{
        Deadline, PatchOutcome, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus,
        TaskTitle, TaskUpdate,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
///
/// Guarded updates lock the task row with `SELECT ... FOR UPDATE` inside a
/// transaction before evaluating the guard.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let record = to_record(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_assignee(&self, employee_id: &EmployeeId) -> TaskRepositoryResult<Vec<Task>> {
        let lookup = employee_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_to.eq(lookup))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update_fields(
        &self,
        id: TaskId,
        update: &TaskUpdate,
    ) -> TaskRepositoryResult<PatchOutcome> {
        let requested = update.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let row = tasks::table
                    .find(id.into_inner())
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;

                let outcome = requested.evaluate(row_to_task(row)?);
                if let PatchOutcome::Applied { current, .. } = &outcome {
                    diesel::update(tasks::table.find(id.into_inner()))
                        .set(&to_record(current))
                        .execute(tx)?;
                }
                Ok(outcome)
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            Ok(deleted > 0)
        })
        .await
    }
}

fn to_record(task: &Task) -> TaskRecord {
    TaskRecord {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        assigned_to: task.assigned_to().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        deadline: task.deadline().map(|deadline| deadline.to_string()),
        created_by: task.created_by().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        assigned_to,
        priority,
        status,
        deadline,
        created_by,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        assigned_to: EmployeeId::new(assigned_to).map_err(TaskRepositoryError::persistence)?,
        priority: TaskPriority::new(priority).map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        deadline: deadline
            .as_deref()
            .map(Deadline::parse)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        created_by: Username::new(created_by).map_err(TaskRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
