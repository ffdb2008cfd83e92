use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::presentation::utils::Body;
use actix_web::{HttpResponse, Scope, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/auth").service(register).service(login)
}

#[post("/register")]
async fn register(
    service: web::Data<AuthService>,
    Body(payload): Body<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let (user, token) = service
        .register(&payload.email, &payload.password, payload.name)
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse::bearer(
        token,
        service.keys().expires_in(),
    )))
}

#[post("/login")]
async fn login(
    service: web::Data<AuthService>,
    Body(payload): Body<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let token = service.login(&payload.email, &payload.password).await?;

    info!(email = %payload.email, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        service.keys().expires_in(),
    )))
}
