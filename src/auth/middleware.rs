//! The ownership boundary: a token is valid only for the one path identity it
//! was issued to.
//!
//! `OwnerGuard` wraps the task and per-user routes. It reads the bearer
//! credential, verifies it, resolves the `{user_id}` path segment against the
//! store, and compares the two identities. Downstream handlers trust this
//! check and do not re-verify ownership of the individual row beyond the
//! store's owner-scoped lookups.

use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::auth::token::TokenService;
use crate::error::{ApiError, AuthFailure};
use crate::store::Storage;

/// Expected scheme tag in `Authorization: <scheme> <token>`.
const AUTH_SCHEME: &str = "JWT";

pub struct OwnerGuard {
    store: Arc<dyn Storage>,
    tokens: TokenService,
}

impl OwnerGuard {
    pub fn new(store: Arc<dyn Storage>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OwnerGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = OwnerGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OwnerGuardService {
            service: Rc::new(service),
            store: Arc::clone(&self.store),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct OwnerGuardService<S> {
    service: Rc<S>,
    store: Arc<dyn Storage>,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for OwnerGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let store = Arc::clone(&self.store);
        let tokens = self.tokens.clone();

        Box::pin(async move {
            if let Err(failure) = authorize(&req, &tokens, store.as_ref()).await {
                // One opaque response for every failure mode, rendered here so
                // the 403 contract holds at the middleware boundary.
                let denied = ApiError::PermissionDenied(failure).error_response();
                return Ok(req.into_response(denied).map_into_right_body());
            }
            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Runs the full check sequence; the request passes through unmodified on
/// success.
async fn authorize(
    req: &ServiceRequest,
    tokens: &TokenService,
    store: &dyn Storage,
) -> Result<(), AuthFailure> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthFailure::MissingHeader)?;
    let token = bearer_token(header)?;

    let claims = tokens.verify(token)?;

    let path_id = path_user_id(req.path())?;

    let user = store
        .user_by_id(path_id)
        .await
        .map_err(|_| AuthFailure::UnknownUser)?;

    if user.id != claims.sub {
        return Err(AuthFailure::IdentityMismatch);
    }

    Ok(())
}

/// Splits `<scheme> <token>`: exactly two parts, scheme literal must match.
fn bearer_token(header: &str) -> Result<&str, AuthFailure> {
    let mut parts = header.split(' ');
    let scheme = parts.next().ok_or(AuthFailure::MissingHeader)?;
    let token = parts.next().ok_or(AuthFailure::MissingHeader)?;
    if parts.next().is_some() {
        return Err(AuthFailure::MissingHeader);
    }
    if scheme != AUTH_SCHEME {
        return Err(AuthFailure::BadScheme);
    }
    Ok(token)
}

/// Pulls the user id out of `/tasks/{user_id}/...` or `/users/{user_id}`.
///
/// The guard runs before actix resolves path parameters, so the segment is
/// taken from the raw path.
fn path_user_id(path: &str) -> Result<Uuid, AuthFailure> {
    let id = path
        .trim_start_matches('/')
        .split('/')
        .nth(1)
        .ok_or(AuthFailure::InvalidPathIdentity)?;
    Uuid::parse_str(id).map_err(|_| AuthFailure::InvalidPathIdentity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_shapes() {
        assert_eq!(bearer_token("JWT abc.def.ghi"), Ok("abc.def.ghi"));
        assert_eq!(bearer_token("JWT"), Err(AuthFailure::MissingHeader));
        assert_eq!(
            bearer_token("JWT one two"),
            Err(AuthFailure::MissingHeader)
        );
        assert_eq!(
            bearer_token("Bearer abc.def.ghi"),
            Err(AuthFailure::BadScheme)
        );
    }

    #[test]
    fn test_path_user_id() {
        let id = Uuid::new_v4();

        let parsed = path_user_id(&format!("/tasks/{}", id)).unwrap();
        assert_eq!(parsed, id);

        let parsed = path_user_id(&format!("/tasks/{}/{}", id, Uuid::new_v4())).unwrap();
        assert_eq!(parsed, id);

        let parsed = path_user_id(&format!("/users/{}", id)).unwrap();
        assert_eq!(parsed, id);

        assert_eq!(
            path_user_id("/tasks/not-a-uuid"),
            Err(AuthFailure::InvalidPathIdentity)
        );
        assert_eq!(
            path_user_id("/tasks"),
            Err(AuthFailure::InvalidPathIdentity)
        );
    }
}
