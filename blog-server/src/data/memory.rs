//! In-memory store used by tests. Mirrors the constraints of the SQL schema:
//! unique user emails, unique (post_id, user_id) likes, and cascading deletes
//! from posts to comments/likes, from comments to their replies and from
//! projects to their tasks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::data::project_repository::ProjectRepository;
use crate::data::task_repository::TaskRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::like::Like;
use crate::domain::post::{Post, PostDraft, PostStatus};
use crate::domain::project::{Project, ProjectDraft};
use crate::domain::task::{Task, TaskDraft};
use crate::domain::user::User;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: Vec<Like>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("store lock poisoned".into()))
    }

    pub fn like_rows(&self, post_id: Uuid) -> usize {
        self.state
            .lock()
            .map(|s| s.likes.iter().filter(|l| l.post_id == post_id).count())
            .unwrap_or(0)
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().map(|s| s.posts.len()).unwrap_or(0)
    }
}

fn newest_first<T>(items: &mut [T], at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(at(item)));
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut state = self.lock()?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(user.email));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        self.lock()?.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.lock()?.posts.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, draft: PostDraft) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock()?;
        Ok(state.posts.get_mut(&id).map(|post| {
            post.title = draft.title;
            post.content = draft.content;
            post.status = draft.status;
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        if state.posts.remove(&id).is_none() {
            return Ok(false);
        }
        state.comments.retain(|_, c| c.post_id != id);
        state.likes.retain(|l| l.post_id != id);
        Ok(true)
    }

    async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<Post>, DomainError> {
        let state = self.lock()?;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| p.status == PostStatus::Published)
            .cloned()
            .collect();
        newest_first(&mut posts, |p| p.created_at);
        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        let state = self.lock()?;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut posts, |p| p.created_at);
        Ok(posts)
    }

    async fn created_since(
        &self,
        author_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        Ok(self
            .lock()?
            .posts
            .values()
            .filter(|p| p.author_id == author_id && p.created_at >= since)
            .map(|p| p.created_at)
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        let mut state = self.lock()?;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(DomainError::Internal("comments_post_id_fkey violated".into()));
        }
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        Ok(self.lock()?.comments.get(&id).cloned())
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock()?;
        Ok(state.comments.get_mut(&id).map(|comment| {
            comment.content = content;
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        if state.comments.remove(&id).is_none() {
            return Ok(false);
        }
        state.comments.retain(|_, c| c.parent_id != Some(id));
        Ok(true)
    }

    async fn list_top_level(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let state = self.lock()?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.parent_id.is_none())
            .cloned()
            .collect();
        newest_first(&mut comments, |c| c.created_at);
        Ok(comments)
    }

    async fn list_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let state = self.lock()?;
        let mut replies: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        replies.sort_by_key(|c| c.created_at);
        Ok(replies)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, DomainError> {
        Ok(self
            .lock()?
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as i64)
    }

    async fn created_since_on_posts_of(
        &self,
        author_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        let state = self.lock()?;
        Ok(state
            .comments
            .values()
            .filter(|c| c.created_at >= since)
            .filter(|c| {
                state
                    .posts
                    .get(&c.post_id)
                    .is_some_and(|p| p.author_id == author_id)
            })
            .map(|c| c.created_at)
            .collect())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .lock()?
            .likes
            .iter()
            .any(|l| l.post_id == post_id && l.user_id == user_id))
    }

    async fn insert(&self, like: Like) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        if state
            .likes
            .iter()
            .any(|l| l.post_id == like.post_id && l.user_id == like.user_id)
        {
            return Ok(false);
        }
        state.likes.push(like);
        Ok(true)
    }

    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.post_id == post_id && l.user_id == user_id));
        Ok(state.likes.len() < before)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, DomainError> {
        Ok(self
            .lock()?
            .likes
            .iter()
            .filter(|l| l.post_id == post_id)
            .count() as i64)
    }

    async fn created_since_on_posts_of(
        &self,
        author_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        let state = self.lock()?;
        Ok(state
            .likes
            .iter()
            .filter(|l| l.created_at >= since)
            .filter(|l| {
                state
                    .posts
                    .get(&l.post_id)
                    .is_some_and(|p| p.author_id == author_id)
            })
            .map(|l| l.created_at)
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        self.lock()?.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        Ok(self.lock()?.projects.get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        draft: ProjectDraft,
    ) -> Result<Option<Project>, DomainError> {
        let mut state = self.lock()?;
        Ok(state.projects.get_mut(&id).map(|project| {
            project.name = draft.name;
            project.description = draft.description;
            project.updated_at = Utc::now();
            project.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        state.tasks.retain(|_, t| t.project_id != id);
        Ok(true)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, DomainError> {
        let state = self.lock()?;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut projects, |p| p.created_at);
        Ok(projects)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        let mut state = self.lock()?;
        if !state.projects.contains_key(&task.project_id) {
            return Err(DomainError::Internal("tasks_project_id_fkey violated".into()));
        }
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DomainError> {
        Ok(self.lock()?.tasks.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, draft: TaskDraft) -> Result<Option<Task>, DomainError> {
        let mut state = self.lock()?;
        Ok(state.tasks.get_mut(&id).map(|task| {
            task.title = draft.title;
            task.description = draft.description;
            task.status = draft.status;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.lock()?.tasks.remove(&id).is_some())
    }

    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DomainError> {
        let state = self.lock()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }
}
