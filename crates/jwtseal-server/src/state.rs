//! Shared server state

use std::sync::Arc;
use std::time::Instant;

use jwtseal::{Algorithm, Secret, TokenValidator};

use crate::config::Config;

/// Default lifetime of issued tokens
pub const DEFAULT_TOKEN_TTL: u64 = 3600;

/// State shared by every handler
///
/// Built once at start-up and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppState {
    pub secret: Secret,
    pub validator: TokenValidator,
    pub api_key: Option<Arc<str>>,
    pub token_ttl: u64,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(secret: impl Into<Secret>, algorithm: Algorithm) -> Self {
        Self {
            secret: secret.into(),
            validator: TokenValidator::new(algorithm),
            api_key: None,
            token_ttl: DEFAULT_TOKEN_TTL,
            started_at: Instant::now(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut state = Self::new(config.secret(), config.algorithm)
            .with_token_ttl(config.token_ttl)
            .with_leeway(config.leeway);
        if let Some(api_key) = &config.api_key {
            state = state.with_api_key(api_key.as_str());
        }
        state
    }

    pub fn with_api_key(mut self, api_key: impl Into<Arc<str>>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_token_ttl(mut self, seconds: u64) -> Self {
        self.token_ttl = seconds;
        self
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.validator = self.validator.leeway(seconds);
        self
    }

    /// Algorithm used for issued tokens and required on verify
    pub fn algorithm(&self) -> Algorithm {
        self.validator.algorithm()
    }
}
