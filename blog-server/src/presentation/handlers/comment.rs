use crate::application::comment_service::CommentService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CommentResponse, CommentsResponse, CreateCommentRequest, SuccessResponse,
    UpdateCommentRequest,
};
use crate::presentation::utils::{AuthenticatedUser, Body, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

#[get("/posts/{id}/comments")]
async fn list_comments(
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comments = comments.list_comments(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(CommentsResponse {
        success: true,
        comments,
    }))
}

#[post("/posts/{id}/comments")]
async fn create_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    Body(payload): Body<CreateCommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment = comments
        .create_comment(
            user.id,
            path.into_inner(),
            &payload.content,
            payload.parent_id,
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        comment_id = %comment.id,
        "comment created"
    );

    Ok(HttpResponse::Created().json(CommentResponse {
        success: true,
        comment,
    }))
}

#[put("/comments/{id}")]
async fn update_comment(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    Body(payload): Body<UpdateCommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment = comments
        .update_comment(user.id, path.into_inner(), &payload.content)
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse {
        success: true,
        comment,
    }))
}

#[delete("/comments/{id}")]
async fn delete_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment_id = path.into_inner();
    comments.delete_comment(user.id, comment_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        comment_id = %comment_id,
        "comment deleted"
    );

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
