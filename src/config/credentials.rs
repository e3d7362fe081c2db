//! Bearer credentials
//!
//! The endpoint authenticates requests with `Authorization: Bearer <key>:<seed>`.

use super::{ConfigError, EnvFile};

/// Env key holding the user key
pub const USER_KEY: &str = "USER_KEY";

/// Env key holding the user seed
pub const USER_SEED: &str = "USER_SEED";

/// Credential pair used to build the bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    seed: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            seed: seed.into(),
        }
    }

    /// Read `USER_KEY` and `USER_SEED`, failing on the first one missing
    pub fn from_env(env: &EnvFile) -> Result<Self, ConfigError> {
        let key = env
            .lookup(USER_KEY)
            .ok_or(ConfigError::MissingCredential(USER_KEY))?;
        let seed = env
            .lookup(USER_SEED)
            .ok_or(ConfigError::MissingCredential(USER_SEED))?;
        Ok(Self { key, seed })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `key:seed`
    pub fn bearer_token(&self) -> String {
        format!("{}:{}", self.key, self.seed)
    }

    /// Full `Authorization` header value
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer_token())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("seed", &"<secret configured>")
            .finish()
    }
}
