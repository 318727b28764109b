//! Command line and environment configuration

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use jwtseal::{Algorithm, Secret};
use tracing::warn;

/// Secret used when neither `--jwt-secret` nor `JWT_SECRET` is set
pub const FALLBACK_SECRET: &str = "fallback-secret-key";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Shared HMAC secret for signing and verifying tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// API key embedded in tokens from /api/issue-token
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Lifetime of issued tokens, in seconds
    #[arg(long, env = "TOKEN_TTL", default_value_t = 3600)]
    pub token_ttl: u64,

    /// Algorithm for issued tokens and the only one accepted on verify
    #[arg(long, env = "JWT_ALGORITHM", default_value = "HS256")]
    pub algorithm: Algorithm,

    /// Clock skew tolerance for exp/nbf, in seconds
    #[arg(
        long,
        env = "JWT_LEEWAY",
        default_value_t = 0,
        value_parser = clap::value_parser!(u64).range(0..=300)
    )]
    pub leeway: u64,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The configured secret, or the fallback with a warning
    pub fn secret(&self) -> Secret {
        match &self.jwt_secret {
            Some(secret) => Secret::from(secret.as_str()),
            None => {
                warn!("JWT_SECRET is not set, signing with the fallback secret");
                Secret::from(FALLBACK_SECRET)
            }
        }
    }
}
