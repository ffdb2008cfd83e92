use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::project::normalize_description;

pub const MIN_TITLE_CHARS: usize = 2;
pub const MAX_TITLE_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(project_id: Uuid, draft: TaskDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

impl TaskDraft {
    pub fn validate(
        title: &str,
        description: Option<&str>,
        status: TaskStatus,
    ) -> Result<Self, DomainError> {
        let title = title.trim();
        let title_chars = title.chars().count();
        if title_chars < MIN_TITLE_CHARS {
            return Err(DomainError::Validation(
                "Task title must be at least 2 characters long".into(),
            ));
        }
        if title_chars > MAX_TITLE_CHARS {
            return Err(DomainError::Validation(
                "Task title must be 120 characters or fewer".into(),
            ));
        }

        Ok(Self {
            title: title.to_string(),
            description: normalize_description(description)?,
            status,
        })
    }
}
