use crate::error::ApiError;
use bcrypt::{hash, verify, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, ApiError> {
    verify(password, hashed_password)
        .map_err(|e| ApiError::Internal(format!("failed to verify password: {}", e)))
}
