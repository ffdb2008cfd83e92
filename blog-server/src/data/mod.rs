pub mod comment_repository;
pub mod like_repository;
pub mod post_repository;
pub mod project_repository;
pub mod task_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory;
