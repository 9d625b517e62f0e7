use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest, TokenService};
use crate::error::{ApiError, AuthFailure};
use crate::models::User;
use crate::store::Storage;

/// Register a new user.
///
/// Hashes the password and persists the account. A taken email surfaces as a
/// plain 400; the store's uniqueness constraint backs up the pre-check.
pub async fn register(
    store: web::Data<dyn Storage>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, ApiError> {
    payload.validate()?;
    let payload = payload.into_inner();

    if store.user_by_email(&payload.email).await.is_ok() {
        return Err(ApiError::BadRequest("email already registered".into()));
    }

    let user = User::new(payload.username, payload.email, &payload.password)?;
    let user = store.create_user(user).await?;

    Ok(HttpResponse::Created().json(user))
}

/// Login with email and password; answers `{username, token}`.
///
/// Unknown email and wrong password produce the same opaque failure so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    store: web::Data<dyn Storage>,
    tokens: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, ApiError> {
    payload.validate()?;

    let user = store
        .user_by_email(&payload.email)
        .await
        .map_err(|_| ApiError::PermissionDenied(AuthFailure::BadCredentials))?;

    if !user.valid_password(&payload.password)? {
        return Err(ApiError::PermissionDenied(AuthFailure::BadCredentials));
    }

    let token = tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        username: user.username,
        token,
    }))
}
