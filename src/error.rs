//! Application error type and its mapping onto HTTP responses.
//!
//! Every handler returns `Result<_, ApiError>`; actix converts the error half
//! into a JSON response via the `ResponseError` impl below. Authentication
//! failures deliberately collapse into a single opaque 403 body so a caller
//! cannot probe which check rejected the request; the concrete reason is
//! carried in [`AuthFailure`] and logged server-side only.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Reason an authentication check rejected a request.
///
/// Never serialized to clients; all variants render as `permission denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// `Authorization` header absent or not exactly `<scheme> <token>`.
    MissingHeader,
    /// Scheme tag was not the expected `JWT` literal.
    BadScheme,
    /// Signature did not verify, or the algorithm was not HS256.
    InvalidSignature,
    /// Token expiry has passed.
    Expired,
    /// Token could not be decoded at all.
    MalformedToken,
    /// The `{user_id}` path segment did not parse as a UUID.
    InvalidPathIdentity,
    /// The path identity does not exist in the store.
    UnknownUser,
    /// Token claim and path identity disagree. This is the ownership boundary.
    IdentityMismatch,
    /// Login with unknown email or wrong password. Kept generic on purpose.
    BadCredentials,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            AuthFailure::MissingHeader => "missing or malformed Authorization header",
            AuthFailure::BadScheme => "unexpected authorization scheme",
            AuthFailure::InvalidSignature => "invalid token signature",
            AuthFailure::Expired => "token expired",
            AuthFailure::MalformedToken => "malformed token",
            AuthFailure::InvalidPathIdentity => "path user id is not a valid UUID",
            AuthFailure::UnknownUser => "path user id does not exist",
            AuthFailure::IdentityMismatch => "token identity does not match path identity",
            AuthFailure::BadCredentials => "bad credentials",
        };
        f.write_str(reason)
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Any authentication failure. Always a uniform 403 body.
    PermissionDenied(AuthFailure),
    /// Client-side error: malformed body, bad deadline, duplicate email, etc.
    BadRequest(String),
    /// Unknown task or user id.
    NotFound(String),
    /// Matched path shape, unmatched method.
    MethodNotAllowed,
    /// Unexpected server-side failure. The cause is logged, not returned.
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::PermissionDenied(reason) => write!(f, "permission denied: {}", reason),
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::MethodNotAllowed => write!(f, "method not allowed"),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::PermissionDenied(reason) => {
                log::debug!("request rejected: {}", reason);
                HttpResponse::Forbidden().json(json!({ "error": "permission denied" }))
            }
            ApiError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({ "error": msg })),
            ApiError::NotFound(msg) => HttpResponse::NotFound().json(json!({ "error": msg })),
            ApiError::MethodNotAllowed => {
                HttpResponse::MethodNotAllowed().json(json!({ "error": "method not allowed" }))
            }
            ApiError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
            }
        }
    }
}

/// Store-layer faults. Row misses become 404s, constraint hits become client
/// errors, anything else stays server-side.
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        match &error {
            sqlx::Error::RowNotFound => ApiError::NotFound("record not found".into()),
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                ApiError::BadRequest("duplicate record".into())
            }
            _ => ApiError::Internal(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(error: ValidationErrors) -> ApiError {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(error: bcrypt::BcryptError) -> ApiError {
        ApiError::Internal(format!("password hashing failed: {}", error))
    }
}
