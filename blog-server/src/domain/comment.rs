use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, user_id: Uuid, parent_id: Option<Uuid>, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            parent_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Checks that a new comment on `post_id` may hang under `self`.
    pub fn accepts_reply_on(&self, post_id: Uuid) -> Result<(), DomainError> {
        if self.post_id != post_id {
            return Err(DomainError::Validation(
                "Parent comment belongs to a different post".into(),
            ));
        }
        if self.is_reply() {
            return Err(DomainError::NestingTooDeep);
        }
        Ok(())
    }

    /// The comment author and the author of the post may delete a comment.
    pub fn can_be_deleted_by(&self, post: &Post, user_id: Uuid) -> bool {
        self.user_id == user_id || post.is_authored_by(user_id)
    }
}

pub fn normalize_comment_content(content: &str) -> Result<String, DomainError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("Comment cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// A top-level comment with its direct replies, oldest reply first.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}
