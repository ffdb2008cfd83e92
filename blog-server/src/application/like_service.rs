use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::like::Like;

#[derive(Clone)]
pub struct LikeService {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(posts: Arc<dyn PostRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { posts, likes }
    }

    /// Flips the like of `user_id` on `post_id` and returns whether the post is
    /// now liked. The write half is a conditional delete or an insert that
    /// ignores the (post_id, user_id) conflict, so a concurrent toggle from the
    /// same user cannot produce duplicate rows.
    #[instrument(skip(self))]
    pub async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::PostNotFound(post_id));
        }

        if self.likes.exists(post_id, user_id).await? {
            if !self.likes.delete(post_id, user_id).await? {
                debug!("like already removed by a concurrent request");
            }
            Ok(false)
        } else {
            if !self.likes.insert(Like::new(post_id, user_id)).await? {
                debug!("like already added by a concurrent request");
            }
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    #[tokio::test]
    async fn toggling_twice_nets_zero() {
        let fx = Fixture::new();
        let user = Uuid::new_v4();
        let post = fx.published_post(Uuid::new_v4(), "Likeable").await;

        assert!(fx.likes.toggle_like(user, post.id).await.unwrap());
        assert_eq!(fx.store.like_rows(post.id), 1);

        assert!(!fx.likes.toggle_like(user, post.id).await.unwrap());
        assert_eq!(fx.store.like_rows(post.id), 0);

        let details = fx.posts.get_post(Some(user), post.id).await.unwrap();
        assert_eq!(details.like_count, 0);
        assert!(!details.user_has_liked);
    }

    #[tokio::test]
    async fn likes_are_per_user() {
        let fx = Fixture::new();
        let post = fx.published_post(Uuid::new_v4(), "Popular").await;
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(fx.likes.toggle_like(a, post.id).await.unwrap());
        assert!(fx.likes.toggle_like(b, post.id).await.unwrap());
        assert_eq!(fx.store.like_rows(post.id), 2);

        assert!(!fx.likes.toggle_like(a, post.id).await.unwrap());
        assert_eq!(fx.store.like_rows(post.id), 1);
    }

    #[tokio::test]
    async fn concurrent_toggles_never_duplicate() {
        let fx = Fixture::new();
        let user = Uuid::new_v4();
        let post = fx.published_post(Uuid::new_v4(), "Racy").await;

        let (first, second) = tokio::join!(
            fx.likes.toggle_like(user, post.id),
            fx.likes.toggle_like(user, post.id)
        );
        first.unwrap();
        second.unwrap();
        assert!(fx.store.like_rows(post.id) <= 1);
    }

    #[tokio::test]
    async fn liking_missing_post_fails() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.likes.toggle_like(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(DomainError::PostNotFound(_))
        ));
    }
}
