//! Process configuration from command-line flags and environment.

use clap::Parser;
use clinica_core::default_log_level;
use std::net::SocketAddr;
use std::path::PathBuf;

const IN_MEMORY_DATABASE: &str = ":memory:";

/// Runtime settings of the `clinica_server` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clinica_server",
    version,
    about = "REST backend for clinical laboratory administration"
)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "CLINICA_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// SQLite database file, or `:memory:` for a throwaway database.
    #[arg(long, env = "CLINICA_DATABASE", default_value = "clinica.db")]
    pub database: String,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, env = "CLINICA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "CLINICA_LOG_DIR")]
    pub log_dir: Option<String>,
}

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl ServerConfig {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn database_location(&self) -> DatabaseLocation {
        match self.database.trim() {
            IN_MEMORY_DATABASE => DatabaseLocation::Memory,
            path => DatabaseLocation::File(PathBuf::from(path)),
        }
    }
}
