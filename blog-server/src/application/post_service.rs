use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostDraft, PostStatus, PostWithDetails};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            likes,
        }
    }

    pub async fn find_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_post(
        &self,
        viewer: Option<Uuid>,
        id: Uuid,
    ) -> Result<PostWithDetails, DomainError> {
        let post = self.find_post(id).await?;
        self.with_details(viewer, post).await
    }

    pub async fn list_published(
        &self,
        viewer: Option<Uuid>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<PostWithDetails>, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);

        let posts = self.posts.list_published(limit, offset).await?;
        try_join_all(posts.into_iter().map(|post| self.with_details(viewer, post))).await
    }

    /// Dashboard listing: every post of the author, drafts included.
    pub async fn list_for_author(
        &self,
        author_id: Uuid,
    ) -> Result<Vec<PostWithDetails>, DomainError> {
        let posts = self.posts.list_by_author(author_id).await?;
        try_join_all(
            posts
                .into_iter()
                .map(|post| self.with_details(Some(author_id), post)),
        )
        .await
    }

    #[instrument(skip(self, title, content))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
        status: Option<PostStatus>,
    ) -> Result<Post, DomainError> {
        let draft = PostDraft::validate(title, content, status.unwrap_or_default())?;
        self.posts.create(Post::new(author_id, draft)).await
    }

    #[instrument(skip(self, title, content))]
    pub async fn update_post(
        &self,
        actor_id: Uuid,
        post_id: Uuid,
        title: &str,
        content: &str,
        status: PostStatus,
    ) -> Result<Post, DomainError> {
        let draft = PostDraft::validate(title, content, status)?;
        let existing = self.find_post(post_id).await?;
        if !existing.is_authored_by(actor_id) {
            return Err(DomainError::Forbidden(
                "You can only update your own posts".into(),
            ));
        }

        self.posts
            .update(post_id, draft)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, actor_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let existing = self.find_post(post_id).await?;
        if !existing.is_authored_by(actor_id) {
            return Err(DomainError::Forbidden(
                "You can only delete your own posts".into(),
            ));
        }

        if !self.posts.delete(post_id).await? {
            return Err(DomainError::PostNotFound(post_id));
        }
        Ok(())
    }

    /// Counts are read fresh for every call; the three queries run concurrently.
    async fn with_details(
        &self,
        viewer: Option<Uuid>,
        post: Post,
    ) -> Result<PostWithDetails, DomainError> {
        let viewer_liked = async {
            match viewer {
                Some(user_id) => self.likes.exists(post.id, user_id).await,
                None => Ok(false),
            }
        };
        let (comment_count, like_count, user_has_liked) = futures_util::try_join!(
            self.comments.count_for_post(post.id),
            self.likes.count_for_post(post.id),
            viewer_liked,
        )?;

        Ok(PostWithDetails {
            post,
            comment_count,
            like_count,
            user_has_liked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    #[tokio::test]
    async fn only_author_can_update() {
        let fx = Fixture::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let post = fx
            .posts
            .create_post(alice, "Draft", "body", None)
            .await
            .unwrap();
        assert_eq!(post.status, PostStatus::Draft);

        let denied = fx
            .posts
            .update_post(bob, post.id, "Hijack", "body", PostStatus::Published)
            .await;
        match denied {
            Err(DomainError::Forbidden(msg)) => {
                assert_eq!(msg, "You can only update your own posts")
            }
            other => panic!("expected forbidden, got {other:?}"),
        }

        let updated = fx
            .posts
            .update_post(alice, post.id, "Final", "body", PostStatus::Published)
            .await
            .unwrap();
        assert_eq!(updated.status, PostStatus::Published);
        assert_eq!(updated.title, "Final");
    }

    #[tokio::test]
    async fn only_author_can_delete() {
        let fx = Fixture::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let post = fx.published_post(alice, "Mine").await;

        assert!(matches!(
            fx.posts.delete_post(bob, post.id).await,
            Err(DomainError::Forbidden(_))
        ));
        fx.posts.delete_post(alice, post.id).await.unwrap();
        assert!(matches!(
            fx.posts.find_post(post.id).await,
            Err(DomainError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn invalid_input_never_writes() {
        let fx = Fixture::new();
        let author = Uuid::new_v4();
        let long_title = "t".repeat(201);
        let long_content = "c".repeat(10_001);

        for (title, content) in [
            ("", "body"),
            ("title", "   "),
            (long_title.as_str(), "body"),
            ("title", long_content.as_str()),
        ] {
            let result = fx.posts.create_post(author, title, content, None).await;
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
        assert_eq!(fx.store.post_count(), 0);
    }

    #[tokio::test]
    async fn update_validates_before_ownership() {
        let fx = Fixture::new();
        let post = fx.published_post(Uuid::new_v4(), "Post").await;
        let result = fx
            .posts
            .update_post(Uuid::new_v4(), post.id, "", "body", PostStatus::Draft)
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let fx = Fixture::new();
        let result = fx
            .posts
            .update_post(Uuid::new_v4(), Uuid::new_v4(), "t", "c", PostStatus::Draft)
            .await;
        assert!(matches!(result, Err(DomainError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn details_reflect_counts_and_viewer() {
        let fx = Fixture::new();
        let (author, reader) = (Uuid::new_v4(), Uuid::new_v4());
        let post = fx.published_post(author, "Counted").await;

        fx.comments
            .create_comment(reader, post.id, "nice", None)
            .await
            .unwrap();
        fx.likes.toggle_like(reader, post.id).await.unwrap();

        let as_reader = fx.posts.get_post(Some(reader), post.id).await.unwrap();
        assert_eq!(as_reader.comment_count, 1);
        assert_eq!(as_reader.like_count, 1);
        assert!(as_reader.user_has_liked);

        let anonymous = fx.posts.get_post(None, post.id).await.unwrap();
        assert!(!anonymous.user_has_liked);
    }

    #[tokio::test]
    async fn published_listing_skips_drafts() {
        let fx = Fixture::new();
        let author = Uuid::new_v4();
        fx.published_post(author, "Public").await;
        fx.posts
            .create_post(author, "Hidden", "body", Some(PostStatus::Draft))
            .await
            .unwrap();

        let listed = fx.posts.list_published(None, None, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].post.title, "Public");

        let mine = fx.posts.list_for_author(author).await.unwrap();
        assert_eq!(mine.len(), 2);
    }
}
