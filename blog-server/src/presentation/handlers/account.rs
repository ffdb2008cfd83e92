use crate::application::analytics_service::AnalyticsService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AnalyticsResponse, PostsResponse};
use crate::presentation::utils::AuthenticatedUser;
use actix_web::{HttpResponse, Scope, get, web};

pub fn scope() -> Scope {
    web::scope("/me").service(my_posts).service(analytics)
}

#[get("/posts")]
async fn my_posts(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let posts = posts.list_for_author(user.id).await?;

    Ok(HttpResponse::Ok().json(PostsResponse {
        success: true,
        posts,
    }))
}

#[get("/analytics")]
async fn analytics(
    user: AuthenticatedUser,
    service: web::Data<AnalyticsService>,
) -> Result<HttpResponse, DomainError> {
    let analytics = service.analytics(user.id).await?;

    Ok(HttpResponse::Ok().json(AnalyticsResponse {
        success: true,
        analytics,
    }))
}
