use libris_core::logging_facility::Profile;
use libris_engine::AuthorLinkPolicy;
use libris_store::PoolConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE: &str = "library.db";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Runtime configuration
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// SQLite file, or `:memory:`
    pub database: PathBuf,
    pub api_prefix: String,
    pub pool: PoolConfig,
    pub author_link_policy: AuthorLinkPolicy,
    pub log_profile: Profile,
    pub log_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            database: PathBuf::from(DEFAULT_DATABASE),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            pool: PoolConfig::default(),
            author_link_policy: AuthorLinkPolicy::default(),
            log_profile: Profile::default(),
            log_file: None,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// `ServerError::Config` when the document does not match the schema.
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// `ServerError::Io` when unreadable, `ServerError::Config` when invalid.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.database, PathBuf::from("library.db"));
        assert_eq!(c.api_prefix, "/api/v1");
        assert_eq!(c.pool.max_connections, 8);
        assert_eq!(c.author_link_policy, AuthorLinkPolicy::TrustCaller);
        assert!(c.log_file.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml(
            r#"
            database = ":memory:"
            author_link_policy = "require-linked"
            log_profile = "production"

            [pool]
            acquire_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(c.database, PathBuf::from(":memory:"));
        assert_eq!(c.author_link_policy, AuthorLinkPolicy::RequireLinked);
        assert_eq!(c.log_profile, Profile::Production);
        assert_eq!(c.pool.acquire_timeout_ms, 250);
        assert_eq!(c.pool.max_connections, 8);
        assert_eq!(c.bind_addr.port(), 8000);
    }

    #[test]
    fn unknown_policy_is_config_error() {
        let err = ServerConfig::from_toml("author_link_policy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libris.toml");
        std::fs::write(&path, "api_prefix = \"/v2\"\n").unwrap();

        assert_eq!(ServerConfig::load(&path).unwrap().api_prefix, "/v2");
        assert!(matches!(
            ServerConfig::load(&dir.path().join("missing.toml")),
            Err(ServerError::Io(_))
        ));
    }
}
