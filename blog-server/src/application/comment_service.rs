use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentThread, normalize_comment_content};
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Top-level comments newest first, each with its replies oldest first.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentThread>, DomainError> {
        let top_level = self.comments.list_top_level(post_id).await?;
        try_join_all(top_level.into_iter().map(|comment| async move {
            let replies = self.comments.list_replies(comment.id).await?;
            Ok::<_, DomainError>(CommentThread { comment, replies })
        }))
        .await
    }

    #[instrument(skip(self, content))]
    pub async fn create_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Comment, DomainError> {
        let content = normalize_comment_content(content)?;
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::PostNotFound(post_id));
        }

        if let Some(parent_id) = parent_id {
            let parent = self
                .comments
                .find_by_id(parent_id)
                .await?
                .ok_or(DomainError::ParentNotFound(parent_id))?;
            parent.accepts_reply_on(post_id)?;
        }

        self.comments
            .create(Comment::new(post_id, user_id, parent_id, content))
            .await
    }

    #[instrument(skip(self, content))]
    pub async fn update_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        content: &str,
    ) -> Result<Comment, DomainError> {
        let content = normalize_comment_content(content)?;
        let comment = self.find_comment(comment_id).await?;
        if comment.user_id != user_id {
            return Err(DomainError::Forbidden(
                "You can only edit your own comments".into(),
            ));
        }

        self.comments
            .update_content(comment_id, content)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))
    }

    /// Allowed for the comment's author and for the author of the post it sits on.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, user_id: Uuid, comment_id: Uuid) -> Result<(), DomainError> {
        let comment = self.find_comment(comment_id).await?;
        let post = self
            .posts
            .find_by_id(comment.post_id)
            .await?
            .ok_or(DomainError::PostNotFound(comment.post_id))?;

        if !comment.can_be_deleted_by(&post, user_id) {
            return Err(DomainError::Forbidden(
                "You can only delete your own comments or comments on your posts".into(),
            ));
        }

        if !self.comments.delete(comment_id).await? {
            return Err(DomainError::CommentNotFound(comment_id));
        }
        Ok(())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CommentNotFound(id))
    }
}
