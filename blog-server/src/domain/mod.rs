pub mod analytics;
pub mod comment;
pub mod error;
pub mod like;
pub mod post;
pub mod project;
pub mod task;
pub mod user;
