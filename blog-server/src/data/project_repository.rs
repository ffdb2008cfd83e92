use crate::domain::error::DomainError;
use crate::domain::project::{Project, ProjectDraft};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: Project) -> Result<Project, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError>;
    async fn update(
        &self,
        id: Uuid,
        draft: ProjectDraft,
    ) -> Result<Option<Project>, DomainError>;
    /// Tasks go with their project.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, owner_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create project: {}", e);
            DomainError::from(e)
        })?;

        info!(project_id = %project.id, owner_id = %project.owner_id, "project created");
        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find project {}: {}", id, e);
            DomainError::from(e)
        })
    }

    async fn update(
        &self,
        id: Uuid,
        draft: ProjectDraft,
    ) -> Result<Option<Project>, DomainError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET name = $1, description = $2, updated_at = $3
            WHERE id = $4
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update project {}: {}", id, e);
            DomainError::from(e)
        })?;

        if project.is_some() {
            info!(project_id = %id, "project updated");
        }
        Ok(project)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete project {}: {}", id, e);
                DomainError::from(e)
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(project_id = %id, "project deleted");
        }
        Ok(removed)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, DomainError> {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching projects of {}: {}", owner_id, e);
            DomainError::from(e)
        })
    }
}
