use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::task::Task;

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(owner_id: Uuid, draft: ProjectDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
}

impl ProjectDraft {
    /// Name and description are trimmed before the length checks.
    pub fn validate(name: &str, description: Option<&str>) -> Result<Self, DomainError> {
        let name = name.trim();
        let name_chars = name.chars().count();
        if name_chars < MIN_NAME_CHARS {
            return Err(DomainError::Validation(
                "Project name must be at least 2 characters long".into(),
            ));
        }
        if name_chars > MAX_NAME_CHARS {
            return Err(DomainError::Validation(
                "Project name must be 100 characters or fewer".into(),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            description: normalize_description(description)?,
        })
    }
}

/// Blank descriptions are stored as `NULL`.
pub fn normalize_description(description: Option<&str>) -> Result<Option<String>, DomainError> {
    let Some(text) = description.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(DomainError::Validation(
            "Description must be 500 characters or fewer".into(),
        ));
    }
    Ok(Some(text.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithTasks {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message<T: std::fmt::Debug>(result: Result<T, DomainError>) -> String {
        match result {
            Err(DomainError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn name_length_is_checked_after_trimming() {
        assert_eq!(
            validation_message(ProjectDraft::validate("  a  ", None)),
            "Project name must be at least 2 characters long"
        );
        assert_eq!(
            validation_message(ProjectDraft::validate(&"n".repeat(101), None)),
            "Project name must be 100 characters or fewer"
        );

        let draft = ProjectDraft::validate("  Garden  ", Some("  beds  ")).unwrap();
        assert_eq!(draft.name, "Garden");
        assert_eq!(draft.description.as_deref(), Some("beds"));
    }

    #[test]
    fn blank_description_becomes_none() {
        assert_eq!(normalize_description(Some("   ")).unwrap(), None);
        assert_eq!(normalize_description(None).unwrap(), None);
        assert_eq!(
            validation_message(normalize_description(Some(&"d".repeat(501)))),
            "Description must be 500 characters or fewer"
        );
    }
}
