use std::sync::Arc;

use crate::application::analytics_service::AnalyticsService;
use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::like_service::LikeService;
use crate::application::post_service::PostService;
use crate::application::project_service::ProjectService;
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::like_repository::PostgresLikeRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::data::project_repository::PostgresProjectRepository;
use crate::data::task_repository::PostgresTaskRepository;
use crate::data::user_repository::PostgresUserRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use crate::presentation::utils::{form_config, json_config, path_config, query_config};
use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

/// Every application service the HTTP layer needs, cheap to clone per worker.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub analytics: AnalyticsService,
    pub projects: ProjectService,
}

impl AppServices {
    pub fn postgres(pool: PgPool, keys: JwtKeys) -> Self {
        let users = Arc::new(PostgresUserRepository::new(pool.clone()));
        let posts = Arc::new(PostgresPostRepository::new(pool.clone()));
        let comments = Arc::new(PostgresCommentRepository::new(pool.clone()));
        let likes = Arc::new(PostgresLikeRepository::new(pool.clone()));
        let projects = Arc::new(PostgresProjectRepository::new(pool.clone()));
        let tasks = Arc::new(PostgresTaskRepository::new(pool));

        Self {
            auth: AuthService::new(users, keys),
            posts: PostService::new(posts.clone(), comments.clone(), likes.clone()),
            comments: CommentService::new(posts.clone(), comments.clone()),
            likes: LikeService::new(posts.clone(), likes.clone()),
            analytics: AnalyticsService::new(posts, comments, likes),
            projects: ProjectService::new(projects, tasks),
        }
    }

    /// Registers app data, extractor limits and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(json_config())
            .app_data(form_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.posts.clone()))
            .app_data(web::Data::new(self.comments.clone()))
            .app_data(web::Data::new(self.likes.clone()))
            .app_data(web::Data::new(self.analytics.clone()))
            .app_data(web::Data::new(self.projects.clone()))
            .service(
                web::scope("/api")
                    .wrap(JwtAuthMiddleware::new(self.auth.keys().clone()))
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::scope())
                    .service(handlers::account::scope())
                    .service(handlers::post::get_posts)
                    .service(handlers::post::get_post)
                    .service(handlers::post::create_post)
                    .service(handlers::post::update_post)
                    .service(handlers::post::delete_post)
                    .service(handlers::post::toggle_like)
                    .service(handlers::comment::list_comments)
                    .service(handlers::comment::create_comment)
                    .service(handlers::comment::update_comment)
                    .service(handlers::comment::delete_comment)
                    .service(handlers::project::list_projects)
                    .service(handlers::project::create_project)
                    .service(handlers::project::update_project)
                    .service(handlers::project::delete_project)
                    .service(handlers::project::create_task)
                    .service(handlers::project::update_task)
                    .service(handlers::project::delete_task),
            );
    }
}

pub async fn start_rest_server(config: AppConfig, services: AppServices) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "HTTP server starting"
    );

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(|cfg| services.configure(cfg))
    })
    .bind(bind_address)?
    .shutdown_timeout(30)
    .run()
    .await?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
