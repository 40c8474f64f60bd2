use core_config::{ConfigError, FromEnv, env_required};

/// Shortest accepted HS256 secret.
pub const MIN_SECRET_LEN: usize = 32;

/// JWT verification settings.
///
/// Loaded from `JWT_SECRET`, which must be at least 32 characters.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    /// # Panics
    /// If the secret is shorter than [`MIN_SECRET_LEN`]. Intended for tests and
    /// fixtures; services load the secret with [`FromEnv`].
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= MIN_SECRET_LEN,
            "JWT secret must be at least 32 characters"
        );
        Self { secret }
    }
}

// Never print the secret.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        Ok(Self { secret })
    }
}
