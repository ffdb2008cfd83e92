use crate::error::BlogClientError;
use crate::models::{Analytics, Comment, CommentThread, Post, PostStatus, Project, Task, TaskStatus};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

const TOKEN_FILE: &str = ".blog_token";

#[derive(Clone)]
pub struct BlogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    token_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    post: Post,
}

#[derive(Debug, Deserialize)]
struct PostCreatedResponse {
    post_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct LikeResponse {
    liked: bool,
}

#[derive(Debug, Deserialize)]
struct CommentsResponse {
    comments: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    comment: Comment,
}

#[derive(Debug, Deserialize)]
struct AnalyticsResponse {
    analytics: Analytics,
}

#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    project: Project,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    task: Task,
}

impl BlogClient {
    pub fn connect(endpoint: &str) -> Result<Self, BlogClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
            token_path: PathBuf::from(TOKEN_FILE),
        })
    }

    /// Overrides where the bearer token is persisted between runs.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn set_token(&mut self, token: String) -> Result<(), BlogClientError> {
        fs::write(&self.token_path, &token)?;
        self.token = Some(token);
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Token from memory, else from the token file. `None` means anonymous.
    fn current_token(&self) -> Option<String> {
        match &self.token {
            Some(t) if !t.is_empty() => Some(t.clone()),
            _ => fs::read_to_string(&self.token_path)
                .ok()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.current_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, BlogClientError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    async fn expect_success(resp: Response) -> Result<(), BlogClientError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<(), BlogClientError> {
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await?;

        let auth: AuthResponse = Self::decode(resp).await?;
        self.set_token(auth.access_token)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), BlogClientError> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        let auth: AuthResponse = Self::decode(resp).await?;
        self.set_token(auth.access_token)
    }

    pub async fn list_posts(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Post>, BlogClientError> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }

        let resp = self
            .authorized(self.client.get(self.url("/posts")).query(&query))
            .send()
            .await?;
        let body: PostsResponse = Self::decode(resp).await?;
        Ok(body.posts)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, BlogClientError> {
        let resp = self
            .authorized(self.client.get(self.url(&format!("/posts/{id}"))))
            .send()
            .await?;
        let body: PostResponse = Self::decode(resp).await?;
        Ok(body.post)
    }

    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        status: Option<PostStatus>,
    ) -> Result<Uuid, BlogClientError> {
        let resp = self
            .authorized(self.client.post(self.url("/posts")))
            .json(&serde_json::json!({
                "title": title,
                "content": content,
                "status": status,
            }))
            .send()
            .await?;
        let body: PostCreatedResponse = Self::decode(resp).await?;
        Ok(body.post_id)
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        status: PostStatus,
    ) -> Result<Post, BlogClientError> {
        let resp = self
            .authorized(self.client.put(self.url(&format!("/posts/{id}"))))
            .json(&serde_json::json!({
                "title": title,
                "content": content,
                "status": status,
            }))
            .send()
            .await?;
        let body: PostResponse = Self::decode(resp).await?;
        Ok(body.post)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), BlogClientError> {
        let resp = self
            .authorized(self.client.delete(self.url(&format!("/posts/{id}"))))
            .send()
            .await?;
        Self::expect_success(resp).await
    }

    /// Returns whether the post is liked after the toggle.
    pub async fn toggle_like(&self, post_id: Uuid) -> Result<bool, BlogClientError> {
        let resp = self
            .authorized(self.client.post(self.url(&format!("/posts/{post_id}/like"))))
            .send()
            .await?;
        let body: LikeResponse = Self::decode(resp).await?;
        Ok(body.liked)
    }

    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentThread>, BlogClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/posts/{post_id}/comments")))
            .send()
            .await?;
        let body: CommentsResponse = Self::decode(resp).await?;
        Ok(body.comments)
    }

    pub async fn create_comment(
        &self,
        post_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Comment, BlogClientError> {
        let resp = self
            .authorized(self.client.post(self.url(&format!("/posts/{post_id}/comments"))))
            .json(&serde_json::json!({
                "content": content,
                "parent_id": parent_id,
            }))
            .send()
            .await?;
        let body: CommentResponse = Self::decode(resp).await?;
        Ok(body.comment)
    }

    pub async fn update_comment(&self, id: Uuid, content: &str) -> Result<Comment, BlogClientError> {
        let resp = self
            .authorized(self.client.put(self.url(&format!("/comments/{id}"))))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;
        let body: CommentResponse = Self::decode(resp).await?;
        Ok(body.comment)
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), BlogClientError> {
        let resp = self
            .authorized(self.client.delete(self.url(&format!("/comments/{id}"))))
            .send()
            .await?;
        Self::expect_success(resp).await
    }

    pub async fn my_posts(&self) -> Result<Vec<Post>, BlogClientError> {
        let resp = self
            .authorized(self.client.get(self.url("/me/posts")))
            .send()
            .await?;
        let body: PostsResponse = Self::decode(resp).await?;
        Ok(body.posts)
    }

    pub async fn analytics(&self) -> Result<Analytics, BlogClientError> {
        let resp = self
            .authorized(self.client.get(self.url("/me/analytics")))
            .send()
            .await?;
        let body: AnalyticsResponse = Self::decode(resp).await?;
        Ok(body.analytics)
    }

    /// The caller's projects, each with its tasks.
    pub async fn list_projects(&self) -> Result<Vec<Project>, BlogClientError> {
        let resp = self
            .authorized(self.client.get(self.url("/projects")))
            .send()
            .await?;
        let body: ProjectsResponse = Self::decode(resp).await?;
        Ok(body.projects)
    }

    pub async fn create_project(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, BlogClientError> {
        let resp = self
            .authorized(self.client.post(self.url("/projects")))
            .json(&serde_json::json!({
                "name": name,
                "description": description,
            }))
            .send()
            .await?;
        let body: ProjectResponse = Self::decode(resp).await?;
        Ok(body.project)
    }

    pub async fn update_project(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, BlogClientError> {
        let resp = self
            .authorized(self.client.put(self.url(&format!("/projects/{id}"))))
            .json(&serde_json::json!({
                "name": name,
                "description": description,
            }))
            .send()
            .await?;
        let body: ProjectResponse = Self::decode(resp).await?;
        Ok(body.project)
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<(), BlogClientError> {
        let resp = self
            .authorized(self.client.delete(self.url(&format!("/projects/{id}"))))
            .send()
            .await?;
        Self::expect_success(resp).await
    }

    pub async fn create_task(
        &self,
        project_id: Uuid,
        title: &str,
        description: Option<&str>,
        status: Option<TaskStatus>,
    ) -> Result<Task, BlogClientError> {
        let resp = self
            .authorized(self.client.post(self.url(&format!("/projects/{project_id}/tasks"))))
            .json(&serde_json::json!({
                "title": title,
                "description": description,
                "status": status,
            }))
            .send()
            .await?;
        let body: TaskResponse = Self::decode(resp).await?;
        Ok(body.task)
    }

    pub async fn update_task(
        &self,
        id: Uuid,
        title: &str,
        description: Option<&str>,
        status: TaskStatus,
    ) -> Result<Task, BlogClientError> {
        let resp = self
            .authorized(self.client.put(self.url(&format!("/tasks/{id}"))))
            .json(&serde_json::json!({
                "title": title,
                "description": description,
                "status": status,
            }))
            .send()
            .await?;
        let body: TaskResponse = Self::decode(resp).await?;
        Ok(body.task)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), BlogClientError> {
        let resp = self
            .authorized(self.client.delete(self.url(&format!("/tasks/{id}"))))
            .send()
            .await?;
        Self::expect_success(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_token_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blog-client-{name}-{}", Uuid::new_v4()))
    }

    #[test]
    fn builds_api_urls_without_double_slash() {
        let client = BlogClient::connect("http://localhost:8080/").unwrap();
        assert_eq!(client.url("/posts"), "http://localhost:8080/api/posts");
    }

    #[test]
    fn token_survives_in_file() {
        let path = temp_token_path("persist");
        let mut client = BlogClient::connect("http://localhost:8080")
            .unwrap()
            .with_token_path(&path);
        client.set_token("abc".into()).unwrap();

        let fresh = BlogClient::connect("http://localhost:8080")
            .unwrap()
            .with_token_path(&path);
        assert_eq!(fresh.token(), None);
        assert_eq!(fresh.current_token().as_deref(), Some("abc"));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_token_file_means_anonymous() {
        let client = BlogClient::connect("http://localhost:8080")
            .unwrap()
            .with_token_path(temp_token_path("missing"));
        assert_eq!(client.current_token(), None);
    }
}
