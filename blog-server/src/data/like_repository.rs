use crate::domain::error::DomainError;
use crate::domain::like::Like;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

/// Likes are unique per (post_id, user_id). `insert` and `delete` are both
/// idempotent, so two concurrent toggles by one user never leave duplicates.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;
    /// Returns `false` if the pair was already present.
    async fn insert(&self, like: Like) -> Result<bool, DomainError>;
    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;
    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, DomainError>;
    /// Creation times of likes on posts written by `author_id`.
    async fn created_since_on_posts_of(
        &self,
        author_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while checking like on {}: {}", post_id, e);
            DomainError::from(e)
        })
    }

    async fn insert(&self, like: Like) -> Result<bool, DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO likes (id, post_id, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(like.id)
        .bind(like.post_id)
        .bind(like.user_id)
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to insert like: {}", e);
            DomainError::from(e)
        })?;

        let added = inserted.rows_affected() > 0;
        if added {
            info!(post_id = %like.post_id, user_id = %like.user_id, "post liked");
        }
        Ok(added)
    }

    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete like: {}", e);
                DomainError::from(e)
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = %post_id, user_id = %user_id, "post unliked");
        }
        Ok(removed)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting likes of {}: {}", post_id, e);
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
            SELECT l.created_at
            FROM likes l
            JOIN posts p ON p.id = l.post_id
            WHERE p.author_id = $1 AND l.created_at >= $2
            "#,
        )
        .bind(author_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching like activity: {}", e);
            DomainError::from(e)
        })
    }
}
