//! Server settings loaded via OrthoConfig.
//!
//! Values come from `BOOKSHELF_*` environment variables, an optional config
//! file, and command-line flags, in OrthoConfig's usual precedence.

use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use bookshelf::domain::TokenPolicy;
use bookshelf::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    8080,
);

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSHELF")]
pub struct ServerSettings {
    /// Socket address to listen on; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
    /// Bearer token lifetime in minutes; `0` disables expiry.
    pub token_ttl_minutes: Option<u32>,
}

impl ServerSettings {
    /// Address to bind, falling back to the default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Pool configuration when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_ref().map(|url| {
            PoolConfig::new(url.clone()).with_max_size(
                self.db_max_connections
                    .unwrap_or(PoolConfig::DEFAULT_MAX_SIZE),
            )
        })
    }

    /// Token lifetime policy.
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy::from_minutes(
            self.token_ttl_minutes
                .unwrap_or(TokenPolicy::DEFAULT_TTL_MINUTES),
        )
    }
}
