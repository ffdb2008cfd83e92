use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::error::DomainError;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            content: draft.content,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Title, content and status that passed validation, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
}

impl PostDraft {
    /// Checks run against the text as submitted; the stored values are trimmed.
    pub fn validate(title: &str, content: &str, status: PostStatus) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(DomainError::Validation(
                "Title must be 200 characters or less".into(),
            ));
        }
        if content.trim().is_empty() {
            return Err(DomainError::Validation("Content is required".into()));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(DomainError::Validation(
                "Content must be 10,000 characters or less".into(),
            ));
        }

        Ok(Self {
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            status,
        })
    }
}

/// A post together with the counts computed for the current request.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithDetails {
    #[serde(flatten)]
    pub post: Post,
    pub comment_count: i64,
    pub like_count: i64,
    pub user_has_liked: bool,
}
