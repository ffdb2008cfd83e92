//! HTTP client for the blog API.

mod error;
mod http_client;
mod models;

pub use error::BlogClientError;
pub use http_client::BlogClient;
pub use models::{
    ActivityDay, Analytics, Comment, CommentThread, Post, PostEngagement, PostStatus, Project,
    Task, TaskStatus,
};
