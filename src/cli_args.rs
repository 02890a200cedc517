use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

use crate::{
    db::{DbConfig, SslMode, DEFAULT_MAX_CONNECTIONS},
    error::ErrorVerbosity,
};

/// Environment variable naming the env file loaded before the arguments are parsed.
pub const ENV_FILE_VAR: &str = "ENV_FILE";

/// Env file loaded when [`ENV_FILE_VAR`] is unset.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Every argument can also be given through its environment variable.
///
/// The variables are read after the env file named by `ENV_FILE` (default `.env`)
/// has been loaded, see [`env_file`]. A missing env file is fatal.
#[derive(Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Database host.
    #[clap(long, env = "DB_HOST")]
    pub db_host: String,

    /// Database port.
    #[clap(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user.
    #[clap(long, env = "DB_USER")]
    pub db_user: String,

    /// Database password.
    #[clap(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name.
    #[clap(long, env = "DB_NAME")]
    pub db_name: String,

    /// TLS mode of the database connection.
    #[clap(long, env = "DB_SSL_MODE", value_enum, default_value_t = SslMode::Prefer)]
    pub db_ssl_mode: SslMode,

    /// Maximum number of pooled database connections.
    #[clap(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub db_max_connections: u32,

    /// Address the HTTP server binds to.
    #[clap(long, env = "APP_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub app_host: IpAddr,

    /// Port the HTTP server listens on.
    #[clap(long, env = "APP_PORT")]
    pub app_port: u16,

    /// How much detail error responses carry.
    #[clap(long, env = "ERROR_VERBOSITY", value_enum, default_value_t = ErrorVerbosity::Message)]
    pub error_verbosity: ErrorVerbosity,

    /// Log every response body. Expensive.
    #[clap(long, env = "TRACE_RESPONSE_BODY")]
    pub trace_response_body: bool,
}

impl CliArgs {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            dbname: self.db_name.clone(),
            ssl_mode: self.db_ssl_mode,
            max_connections: self.db_max_connections,
        }
    }

    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.app_host, self.app_port)
    }
}

/// Returns the path of the env file: `$ENV_FILE`, or `.env` when unset or empty.
pub fn env_file() -> String {
    env_file_from(std::env::var(ENV_FILE_VAR).ok())
}

fn env_file_from(value: Option<String>) -> String {
    value
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| DEFAULT_ENV_FILE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_defaults_to_dot_env() {
        assert_eq!(env_file_from(None), ".env");
        assert_eq!(env_file_from(Some(String::new())), ".env");
        assert_eq!(env_file_from(Some("prod.env".to_string())), "prod.env");
    }
}
