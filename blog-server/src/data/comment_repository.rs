use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, post_id, user_id, parent_id, content, created_at, updated_at";

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    async fn update_content(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, DomainError>;
    /// Replies go with their parent.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Comments without a parent, newest first.
    async fn list_top_level(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
    /// Direct replies, oldest first.
    async fn list_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, DomainError>;
    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, DomainError>;
    /// Creation times of comments left on posts written by `author_id`.
    async fn created_since_on_posts_of(
        &self,
        author_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, user_id, parent_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(comment.parent_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment: {}", e);
            DomainError::from(e)
        })?;

        info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            parent_id = ?comment.parent_id,
            "comment created"
        );
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find comment {}: {}", id, e);
            DomainError::from(e)
        })
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET content = $1, updated_at = $2
            WHERE id = $3
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update comment {}: {}", id, e);
            DomainError::from(e)
        })?;

        if comment.is_some() {
            info!(comment_id = %id, "comment updated");
        }
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete comment {}: {}", id, e);
                DomainError::from(e)
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(comment_id = %id, "comment deleted");
        }
        Ok(removed)
    }

    async fn list_top_level(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE post_id = $1 AND parent_id IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments of {}: {}", post_id, e);
            DomainError::from(e)
        })
    }

    async fn list_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE parent_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching replies of {}: {}", parent_id, e);
            DomainError::from(e)
        })
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting comments of {}: {}", post_id, e);
                DomainError::from(e)
            })
    }

    async fn created_since_on_posts_of(
        &self,
        author_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT c.created_at
            FROM comments c
            JOIN posts p ON p.id = c.post_id
            WHERE p.author_id = $1 AND c.created_at >= $2
            "#,
        )
        .bind(author_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comment activity: {}", e);
            DomainError::from(e)
        })
    }
}
