use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::data::project_repository::ProjectRepository;
use crate::data::task_repository::TaskRepository;
use crate::domain::error::DomainError;
use crate::domain::project::{Project, ProjectDraft, ProjectWithTasks};
use crate::domain::task::{Task, TaskDraft, TaskStatus};

/// Projects and their tasks. Every operation is scoped to the project owner.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { projects, tasks }
    }

    pub async fn list_projects(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<ProjectWithTasks>, DomainError> {
        let projects = self.projects.list_by_owner(owner_id).await?;
        try_join_all(projects.into_iter().map(|project| async move {
            let tasks = self.tasks.list_for_project(project.id).await?;
            Ok::<_, DomainError>(ProjectWithTasks { project, tasks })
        }))
        .await
    }

    #[instrument(skip(self, name, description))]
    pub async fn create_project(
        &self,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, DomainError> {
        let draft = ProjectDraft::validate(name, description)?;
        self.projects.create(Project::new(owner_id, draft)).await
    }

    #[instrument(skip(self, name, description))]
    pub async fn update_project(
        &self,
        actor_id: Uuid,
        project_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, DomainError> {
        let draft = ProjectDraft::validate(name, description)?;
        self.owned_project(actor_id, project_id, "You can only update your own projects")
            .await?;

        self.projects
            .update(project_id, draft)
            .await?
            .ok_or(DomainError::ProjectNotFound(project_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_project(
        &self,
        actor_id: Uuid,
        project_id: Uuid,
    ) -> Result<(), DomainError> {
        self.owned_project(actor_id, project_id, "You can only delete your own projects")
            .await?;

        if !self.projects.delete(project_id).await? {
            return Err(DomainError::ProjectNotFound(project_id));
        }
        Ok(())
    }

    #[instrument(skip(self, title, description))]
    pub async fn create_task(
        &self,
        actor_id: Uuid,
        project_id: Uuid,
        title: &str,
        description: Option<&str>,
        status: Option<TaskStatus>,
    ) -> Result<Task, DomainError> {
        let draft = TaskDraft::validate(title, description, status.unwrap_or_default())?;
        self.owned_project(
            actor_id,
            project_id,
            "You can only add tasks to your own projects",
        )
        .await?;

        self.tasks.create(Task::new(project_id, draft)).await
    }

    #[instrument(skip(self, title, description))]
    pub async fn update_task(
        &self,
        actor_id: Uuid,
        task_id: Uuid,
        title: &str,
        description: Option<&str>,
        status: TaskStatus,
    ) -> Result<Task, DomainError> {
        let draft = TaskDraft::validate(title, description, status)?;
        let task = self.find_task(task_id).await?;
        self.owned_project(
            actor_id,
            task.project_id,
            "You can only update tasks in your own projects",
        )
        .await?;

        self.tasks
            .update(task_id, draft)
            .await?
            .ok_or(DomainError::TaskNotFound(task_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, actor_id: Uuid, task_id: Uuid) -> Result<(), DomainError> {
        let task = self.find_task(task_id).await?;
        self.owned_project(
            actor_id,
            task.project_id,
            "You can only delete tasks in your own projects",
        )
        .await?;

        if !self.tasks.delete(task_id).await? {
            return Err(DomainError::TaskNotFound(task_id));
        }
        Ok(())
    }

    async fn find_task(&self, task_id: Uuid) -> Result<Task, DomainError> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DomainError::TaskNotFound(task_id))
    }

    async fn owned_project(
        &self,
        actor_id: Uuid,
        project_id: Uuid,
        denied: &str,
    ) -> Result<Project, DomainError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(DomainError::ProjectNotFound(project_id))?;
        if !project.is_owned_by(actor_id) {
            return Err(DomainError::Forbidden(denied.into()));
        }
        Ok(project)
    }
}
