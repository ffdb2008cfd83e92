pub mod analytics_service;
pub mod auth_service;
pub mod comment_service;
pub mod like_service;
pub mod post_service;
pub mod project_service;

#[cfg(test)]
pub(crate) mod test_support;
