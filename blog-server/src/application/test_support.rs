use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::analytics_service::AnalyticsService;
use crate::application::comment_service::CommentService;
use crate::application::like_service::LikeService;
use crate::application::post_service::PostService;
use crate::application::project_service::ProjectService;
use crate::data::comment_repository::CommentRepository;
use crate::data::memory::InMemoryStore;
use crate::domain::comment::Comment;
use crate::domain::post::{Post, PostStatus};

/// Every service wired to one shared in-memory store.
pub(crate) struct Fixture {
    pub store: InMemoryStore,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub analytics: AnalyticsService,
    pub projects: ProjectService,
}

impl Fixture {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let shared = Arc::new(store.clone());
        Self {
            posts: PostService::new(shared.clone(), shared.clone(), shared.clone()),
            comments: CommentService::new(shared.clone(), shared.clone()),
            likes: LikeService::new(shared.clone(), shared.clone()),
            analytics: AnalyticsService::new(shared.clone(), shared.clone(), shared.clone()),
            projects: ProjectService::new(shared.clone(), shared),
            store,
        }
    }

    pub async fn published_post(&self, author_id: Uuid, title: &str) -> Post {
        self.posts
            .create_post(author_id, title, "body", Some(PostStatus::Published))
            .await
            .unwrap()
    }

    /// Inserts a comment with a fixed timestamp, bypassing validation.
    pub async fn seed_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        content: &str,
        at: DateTime<Utc>,
    ) -> Comment {
        let mut comment = Comment::new(post_id, user_id, parent_id, content.into());
        comment.created_at = at;
        comment.updated_at = at;
        CommentRepository::create(&self.store, comment).await.unwrap()
    }
}
