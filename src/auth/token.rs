//! Issuing and verifying the bearer tokens that carry a user identity claim.
//!
//! The signing secret is injected through the constructor rather than read from
//! ambient process state, so tests can run several services with distinct keys
//! side by side. There is no refresh mechanism: a token lives 24 hours and
//! re-login is the only renewal path.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, AuthFailure};

/// Token lifetime from issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims encoded in a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user the token was issued to.
    pub sub: Uuid,
    /// Expiration timestamp, seconds since epoch.
    pub exp: usize,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Signs a token for `user_id` expiring [`TOKEN_TTL_HOURS`] from now.
    pub fn issue(&self, user_id: Uuid) -> Result<String, ApiError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
            .ok_or_else(|| ApiError::Internal("token expiry overflow".into()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Checks signature and expiry and extracts the claims.
    ///
    /// Validation is pinned to HS256, so a token presenting any other
    /// algorithm in its header fails as a signature problem rather than being
    /// decoded under the attacker's choice of scheme.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthFailure> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthFailure::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthFailure::InvalidSignature
                }
                _ => AuthFailure::MalformedToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"unit-test-secret")
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_expiry_is_exactly_24h_from_issuance() {
        let tokens = service();
        let before = Utc::now().timestamp() as usize;
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        let after = Utc::now().timestamp() as usize;

        let claims = tokens.verify(&token).unwrap();
        let ttl_secs = (TOKEN_TTL_HOURS * 3600) as usize;
        assert!(claims.exp >= before + ttl_secs);
        assert!(claims.exp <= after + ttl_secs);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        // Two hours past expiry, well beyond the decoder's leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert_eq!(tokens.verify(&token), Err(AuthFailure::Expired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = TokenService::new(b"secret-a");
        let verifier = TokenService::new(b"secret-b");
        let token = signer.issue(Uuid::new_v4()).unwrap();

        assert_eq!(verifier.verify(&token), Err(AuthFailure::InvalidSignature));
    }

    #[test]
    fn test_unexpected_algorithm_rejected() {
        let tokens = service();
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        // Same secret, different HMAC variant in the header.
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let tokens = service();
        assert_eq!(
            tokens.verify("not-a-token"),
            Err(AuthFailure::MalformedToken)
        );
    }
}
