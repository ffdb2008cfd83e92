pub mod account;
pub mod auth;
pub mod comment;
pub mod post;
pub mod project;
