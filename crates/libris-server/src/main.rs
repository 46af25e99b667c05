//! Libris server binary
//!
//! Configuration precedence: CLI flags and `LIBRIS_*` environment variables
//! (a `.env` file is honored), then the TOML file, then built-in defaults.

use anyhow::Context;
use clap::Parser;
use libris_core::logging_facility::{self, Profile};
use libris_engine::AuthorLinkPolicy;
use libris_server::{LibrisServer, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "libris-server")]
#[command(about = "Libris - authors and books catalog over HTTP", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "LIBRIS_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8000
    #[arg(long, env = "LIBRIS_BIND")]
    bind: Option<SocketAddr>,

    /// SQLite database file, or :memory:
    #[arg(long, env = "LIBRIS_DATABASE")]
    database: Option<PathBuf>,

    /// Route prefix for the catalog endpoints
    #[arg(long, env = "LIBRIS_API_PREFIX")]
    api_prefix: Option<String>,

    /// trust-caller or require-linked
    #[arg(long, env = "LIBRIS_AUTHOR_LINK_POLICY")]
    author_link_policy: Option<AuthorLinkPolicy>,

    /// development or production
    #[arg(long, env = "LIBRIS_LOG_PROFILE")]
    log_profile: Option<Profile>,

    /// Append logs to this file instead of stdout
    #[arg(long, env = "LIBRIS_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(prefix) = self.api_prefix {
            config.api_prefix = prefix;
        }
        if let Some(policy) = self.author_link_policy {
            config.author_link_policy = policy;
        }
        if let Some(profile) = self.log_profile {
            config.log_profile = profile;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal
    dotenvy::dotenv().ok();

    let config = Cli::parse().into_config()?;

    match &config.log_file {
        Some(path) => logging_facility::init_with_file(config.log_profile, path)
            .with_context(|| format!("opening log file {}", path.display()))?,
        None => logging_facility::init(config.log_profile),
    }

    let server = LibrisServer::open(config).context("opening store")?;
    server.serve().await.context("serving")?;
    Ok(())
}
