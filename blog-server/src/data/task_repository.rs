use crate::domain::error::DomainError;
use crate::domain::task::{Task, TaskDraft};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

const TASK_COLUMNS: &str = "id, project_id, title, description, status, created_at, updated_at";

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: Task) -> Result<Task, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DomainError>;
    async fn update(&self, id: Uuid, draft: TaskDraft) -> Result<Option<Task>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Oldest first.
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, project_id, title, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create task: {}", e);
            DomainError::from(e)
        })?;

        info!(task_id = %task.id, project_id = %task.project_id, "task created");
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DomainError> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find task {}: {}", id, e);
                DomainError::from(e)
            })
    }

    async fn update(&self, id: Uuid, draft: TaskDraft) -> Result<Option<Task>, DomainError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $1, description = $2, status = $3, updated_at = $4
            WHERE id = $5
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update task {}: {}", id, e);
            DomainError::from(e)
        })?;

        if let Some(task) = &task {
            info!(task_id = %id, status = ?task.status, "task updated");
        }
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete task {}: {}", id, e);
                DomainError::from(e)
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(task_id = %id, "task deleted");
        }
        Ok(removed)
    }

    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DomainError> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching tasks of {}: {}", project_id, e);
            DomainError::from(e)
        })
    }
}
