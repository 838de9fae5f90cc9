//! Centralized configuration (environment variables + defaults).

use anyhow::Context;

/// Runtime configuration, read once at startup and handed to request
/// handlers through the application state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Postgres connection string (required).
    pub database_url: String,
    /// HMAC secret for session tokens (required).
    pub jwt_secret: String,
    /// Solana RPC URL. When absent the wallet connector is disabled.
    pub solana_rpc_url: Option<String>,
    /// Karma token program id. When absent the wallet connector is disabled.
    pub karma_program_id: Option<String>,
    /// Path to the admin keypair used to authorize mint/payout.
    pub admin_keypair_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        Ok(Config {
            bind_addr: std::env::var("KARMA_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            solana_rpc_url: std::env::var("SOLANA_RPC_URL").ok(),
            karma_program_id: std::env::var("KARMA_PROGRAM_ID").ok(),
            admin_keypair_path: std::env::var("ADMIN_KEYPAIR_PATH")
                .unwrap_or_else(|_| "~/.config/solana/id.json".to_string()),
        })
    }

    /// True when every variable needed to reach the chain is present.
    pub fn chain_configured(&self) -> bool {
        self.solana_rpc_url.is_some() && self.karma_program_id.is_some()
    }
}
