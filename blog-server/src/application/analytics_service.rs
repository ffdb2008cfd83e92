use std::sync::Arc;

use chrono::{Duration, Utc};
use futures_util::future::try_join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::analytics::{
    ActivityEvents, Analytics, ENGAGEMENT_POSTS, PostEngagement, TIMELINE_DAYS,
};
use crate::domain::error::DomainError;
use crate::domain::post::PostStatus;

#[derive(Clone)]
pub struct AnalyticsService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl AnalyticsService {
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

    /// Engagement summary over the author's own posts.
    #[instrument(skip(self))]
    pub async fn analytics(&self, author_id: Uuid) -> Result<Analytics, DomainError> {
        let posts = self.posts.list_by_author(author_id).await?;

        let counts = try_join_all(posts.iter().map(|post| async move {
            futures_util::try_join!(
                self.comments.count_for_post(post.id),
                self.likes.count_for_post(post.id),
            )
        }))
        .await?;

        let published_posts = posts
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .count() as i64;
        let total_comments: i64 = counts.iter().map(|(comments, _)| comments).sum();
        let total_likes: i64 = counts.iter().map(|(_, likes)| likes).sum();

        // posts arrive newest first
        let posts_with_engagement = posts
            .iter()
            .zip(&counts)
            .filter(|(post, _)| post.status == PostStatus::Published)
            .take(ENGAGEMENT_POSTS)
            .map(|(post, (comments, likes))| PostEngagement {
                id: post.id,
                title: post.title.clone(),
                comments: *comments,
                likes: *likes,
            })
            .collect();

        let since = Utc::now() - Duration::days(TIMELINE_DAYS);
        let (post_times, comment_times, like_times) = futures_util::try_join!(
            self.posts.created_since(author_id, since),
            self.comments.created_since_on_posts_of(author_id, since),
            self.likes.created_since_on_posts_of(author_id, since),
        )?;
        let activity_timeline = ActivityEvents {
            posts: post_times,
            comments: comment_times,
            likes: like_times,
        }
        .into_timeline();

        Ok(Analytics {
            total_posts: posts.len() as i64,
            published_posts,
            draft_posts: posts.len() as i64 - published_posts,
            total_comments,
            total_likes,
            posts_with_engagement,
            activity_timeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    #[tokio::test]
    async fn summarises_own_posts_only() {
        let fx = Fixture::new();
        let (author, reader, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let popular = fx.published_post(author, "Popular").await;
        fx.posts
            .create_post(author, "Unfinished", "body", Some(PostStatus::Draft))
            .await
            .unwrap();
        let foreign = fx.published_post(other, "Someone else").await;

        fx.comments
            .create_comment(reader, popular.id, "great", None)
            .await
            .unwrap();
        fx.likes.toggle_like(reader, popular.id).await.unwrap();
        fx.likes.toggle_like(author, popular.id).await.unwrap();
        fx.likes.toggle_like(reader, foreign.id).await.unwrap();

        let stats = fx.analytics.analytics(author).await.unwrap();
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.published_posts, 1);
        assert_eq!(stats.draft_posts, 1);
        assert_eq!(stats.total_comments, 1);
        assert_eq!(stats.total_likes, 2);

        assert_eq!(stats.posts_with_engagement.len(), 1);
        assert_eq!(stats.posts_with_engagement[0].id, popular.id);
        assert_eq!(stats.posts_with_engagement[0].likes, 2);

        let today = stats.activity_timeline.last().unwrap();
        assert_eq!(today.posts, 2);
        assert_eq!(today.comments, 1);
        assert_eq!(today.likes, 2);
    }

    #[tokio::test]
    async fn empty_dashboard() {
        let fx = Fixture::new();
        let stats = fx.analytics.analytics(Uuid::new_v4()).await.unwrap();
        assert_eq!(stats.total_posts, 0);
        assert!(stats.posts_with_engagement.is_empty());
        assert!(stats.activity_timeline.is_empty());
    }
}
