use crate::application::like_service::LikeService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CreatePostRequest, LikeResponse, ListPostsQuery, PostCreatedResponse, PostResponse,
    PostsResponse, SuccessResponse, UpdatePostRequest,
};
use crate::presentation::utils::{AuthenticatedUser, Body, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

#[get("/posts")]
async fn get_posts(
    viewer: Option<AuthenticatedUser>,
    posts: web::Data<PostService>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let query = query.into_inner();
    let posts = posts
        .list_published(viewer.map(|u| u.id), query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(PostsResponse {
        success: true,
        posts,
    }))
}

#[get("/posts/{id}")]
async fn get_post(
    viewer: Option<AuthenticatedUser>,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = posts
        .get_post(viewer.map(|u| u.id), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        success: true,
        post,
    }))
}

#[post("/posts")]
async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    Body(payload): Body<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = posts
        .create_post(user.id, &payload.title, &payload.content, payload.status)
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(PostCreatedResponse {
        success: true,
        post_id: post.id,
    }))
}

#[put("/posts/{id}")]
async fn update_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    Body(payload): Body<UpdatePostRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = posts
        .update_post(
            user.id,
            path.into_inner(),
            &payload.title,
            &payload.content,
            payload.status,
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post.id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(PostResponse {
        success: true,
        post,
    }))
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

#[post("/posts/{id}/like")]
async fn toggle_like(
    req: HttpRequest,
    user: AuthenticatedUser,
    likes: web::Data<LikeService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let liked = likes.toggle_like(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        liked,
        "like toggled"
    );

    Ok(HttpResponse::Ok().json(LikeResponse {
        success: true,
        liked,
    }))
}
