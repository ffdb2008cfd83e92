use crate::application::project_service::ProjectService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CreateTaskRequest, ProjectRequest, ProjectResponse, ProjectsResponse, SuccessResponse,
    TaskResponse, UpdateTaskRequest,
};
use crate::presentation::utils::{AuthenticatedUser, Body, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

#[get("/projects")]
async fn list_projects(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
) -> Result<HttpResponse, DomainError> {
    let projects = projects.list_projects(user.id).await?;

    Ok(HttpResponse::Ok().json(ProjectsResponse {
        success: true,
        projects,
    }))
}

#[post("/projects")]
async fn create_project(
    req: HttpRequest,
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    Body(payload): Body<ProjectRequest>,
) -> Result<HttpResponse, DomainError> {
    let project = projects
        .create_project(user.id, &payload.name, payload.description.as_deref())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        project_id = %project.id,
        "project created"
    );

    Ok(HttpResponse::Created().json(ProjectResponse {
        success: true,
        project,
    }))
}

#[put("/projects/{id}")]
async fn update_project(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    Body(payload): Body<ProjectRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let project = projects
        .update_project(
            user.id,
            path.into_inner(),
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ProjectResponse {
        success: true,
        project,
    }))
}

#[delete("/projects/{id}")]
async fn delete_project(
    req: HttpRequest,
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let project_id = path.into_inner();
    projects.delete_project(user.id, project_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        project_id = %project_id,
        "project deleted"
    );

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

#[post("/projects/{id}/tasks")]
async fn create_task(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    Body(payload): Body<CreateTaskRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let task = projects
        .create_task(
            user.id,
            path.into_inner(),
            &payload.title,
            payload.description.as_deref(),
            payload.status,
        )
        .await?;

    Ok(HttpResponse::Created().json(TaskResponse {
        success: true,
        task,
    }))
}

#[put("/tasks/{id}")]
async fn update_task(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    Body(payload): Body<UpdateTaskRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let task = projects
        .update_task(
            user.id,
            path.into_inner(),
            &payload.title,
            payload.description.as_deref(),
            payload.status,
        )
        .await?;

    Ok(HttpResponse::Ok().json(TaskResponse {
        success: true,
        task,
    }))
}

#[delete("/tasks/{id}")]
async fn delete_task(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    projects.delete_task(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
