use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Access token lifetime in seconds (15 minutes).
pub const ACCESS_TOKEN_TTL: i64 = 900;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id; stored as the owner of listings and reviews
    pub sub: String,
    pub email: String,
    /// Display name; used as the review author and default seller name
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// HS256 signer/verifier. Cheap to clone.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        tracing::info!("JWT auth initialized");
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
            validation: Arc::new(Validation::new(Algorithm::HS256)),
        }
    }

    /// Issue a token for `user_id`. The API only verifies tokens; this is used by
    /// the account service and by tests.
    pub fn create_access_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        roles: &[String],
    ) -> eyre::Result<String> {
        self.create_token(user_id, email, name, roles, ACCESS_TOKEN_TTL)
    }

    fn create_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        roles: &[String],
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            roles: roles.to_vec(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        Ok(decode::<JwtClaims>(token, &self.decoding, &self.validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(secret: &str) -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(secret))
    }

    #[test]
    fn test_issue_and_verify() {
        let auth = auth("marketplace-test-secret-0123456789abcdef");
        let token = auth
            .create_access_token("user-1", "ada@farm.test", "Ada", &["farmer".to_string()])
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.roles, vec!["farmer".to_string()]);
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let issuer = auth("marketplace-test-secret-0123456789abcdef");
        let verifier = auth("another-marketplace-secret-0123456789abcd");
        let token = issuer.create_access_token("user-1", "a@b.c", "Ada", &[]).unwrap();

        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let auth = auth("marketplace-test-secret-0123456789abcdef");
        // Past the default 60s leeway
        let token = auth.create_token("user-1", "a@b.c", "Ada", &[], -120).unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let auth = auth("marketplace-test-secret-0123456789abcdef");
        assert!(auth.verify_token("not.a.jwt").is_err());
    }
}
