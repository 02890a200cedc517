use std::fmt;

use derivative::Derivative;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// TLS mode of the database connection, spelled the way libpq spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Allow => PgSslMode::Allow,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyCa => PgSslMode::VerifyCa,
            SslMode::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

/// Connection parameters of the database.
///
/// [`Display`](fmt::Display) renders the connection descriptor with the password masked.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    pub password: String,
    pub dbname: String,
    pub ssl_mode: SslMode,
    pub max_connections: u32,
}

impl DbConfig {
    /// Returns the connection descriptor: `host=.. port=.. user=.. password=.. dbname=.. sslmode=..`.
    pub fn descriptor(&self) -> String {
        self.render_descriptor(&self.password)
    }

    fn render_descriptor(&self, password: &str) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            self.host,
            self.port,
            self.user,
            password,
            self.dbname,
            self.ssl_mode.as_str()
        )
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
            .ssl_mode(self.ssl_mode.into())
    }
}

impl fmt::Display for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_descriptor("..."))
    }
}

/// Opens the connection pool.
///
/// The first connection is established eagerly, so an unreachable database or
/// rejected credentials fail here rather than on the first request.
#[tracing::instrument(name = "connect", skip_all, fields(db = %config))]
pub async fn connect(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to database");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await?;

    tracing::info!("Connected to database");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DbConfig {
        DbConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "books".to_string(),
            password: "hunter2".to_string(),
            dbname: "library".to_string(),
            ssl_mode: SslMode::VerifyFull,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    #[test]
    fn descriptor_has_fixed_field_order() {
        assert_eq!(
            config().descriptor(),
            "host=localhost port=5432 user=books password=hunter2 dbname=library sslmode=verify-full"
        );
    }

    #[test]
    fn display_and_debug_mask_the_password() {
        let config = config();

        let displayed = config.to_string();
        assert!(displayed.contains("password=..."));
        assert!(!displayed.contains("hunter2"));

        let debugged = format!("{config:?}");
        assert!(debugged.contains("password: ..."));
        assert!(!debugged.contains("hunter2"));
    }

    #[test]
    fn ssl_mode_maps_onto_libpq_names() {
        use clap::ValueEnum;

        for mode in SslMode::value_variants() {
            let name = mode
                .to_possible_value()
                .expect("No variant is skipped")
                .get_name()
                .to_string();

            assert_eq!(name, mode.as_str());
        }

        assert_eq!(SslMode::default(), SslMode::Prefer);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connects_with_environment_config() {
        let config = DbConfig {
            host: std::env::var("DB_HOST").expect("DB_HOST required"),
            port: std::env::var("DB_PORT")
                .expect("DB_PORT required")
                .parse()
                .expect("DB_PORT is a port"),
            user: std::env::var("DB_USER").expect("DB_USER required"),
            password: std::env::var("DB_PASSWORD").unwrap_or_default(),
            dbname: std::env::var("DB_NAME").expect("DB_NAME required"),
            ssl_mode: SslMode::Prefer,
            max_connections: 1,
        };

        let pool = connect(&config).await.expect("Connection failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("Query failed");

        assert_eq!(result.0, 1);
    }
}
