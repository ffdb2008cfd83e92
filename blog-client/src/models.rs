use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Published => write!(f, "published"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub user_has_liked: bool,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {} ({})", self.id, self.title, self.status)?;
        writeln!(
            f,
            "by {} at {} | {} comments, {} likes{}",
            self.author_id,
            self.created_at.format("%Y-%m-%d %H:%M"),
            self.comment_count,
            self.like_count,
            if self.user_has_liked { " (liked)" } else { "" }
        )?;
        write!(f, "{}", self.content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analytics {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_comments: i64,
    pub total_likes: i64,
    pub posts_with_engagement: Vec<PostEngagement>,
    pub activity_timeline: Vec<ActivityDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostEngagement {
    pub id: Uuid,
    pub title: String,
    pub comments: i64,
    pub likes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub posts: i64,
    pub comments: i64,
    pub likes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::InProgress => write!(f, "in progress"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only filled in by the project listing.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_thread_with_flattened_comment() {
        let json = r#"{
            "id": "6f1c1c52-8d4e-4a43-9f1c-2b7b1c0c7a11",
            "post_id": "0b8f3c5e-2a9f-4f71-9a0e-3c1d2b4a5e6f",
            "user_id": "9d2e4f6a-1b3c-4d5e-8f7a-0b1c2d3e4f5a",
            "parent_id": null,
            "content": "top",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z",
            "replies": []
        }"#;
        let thread: CommentThread = serde_json::from_str(json).unwrap();
        assert_eq!(thread.comment.content, "top");
        assert!(thread.comment.parent_id.is_none());
        assert!(thread.replies.is_empty());
    }

    #[test]
    fn decodes_project_listing_entry() {
        let json = r#"{
            "id": "6f1c1c52-8d4e-4a43-9f1c-2b7b1c0c7a11",
            "owner_id": "9d2e4f6a-1b3c-4d5e-8f7a-0b1c2d3e4f5a",
            "name": "Garden",
            "description": null,
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z",
            "tasks": [{
                "id": "0b8f3c5e-2a9f-4f71-9a0e-3c1d2b4a5e6f",
                "project_id": "6f1c1c52-8d4e-4a43-9f1c-2b7b1c0c7a11",
                "title": "Water",
                "description": "daily",
                "status": "IN_PROGRESS",
                "created_at": "2024-03-01T11:00:00Z",
                "updated_at": "2024-03-01T11:00:00Z"
            }]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(project.tasks[0].status.to_string(), "in progress");
    }
}
