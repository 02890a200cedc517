use std::sync::Arc;

use anyhow::Context;
use books_api::{
    cli_args::{env_file, CliArgs},
    db,
    server::{Server, ServerConfig},
    store::PgBookStore,
};
use clap::Parser;

fn init_tracing() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = env_file();
    dotenv::from_filename(&env_file)
        .with_context(|| format!("Failed to load environment file `{env_file}`"))?;

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "server=trace,books_api=trace,tower_http=trace");
    }

    init_tracing()?;

    tracing::info!("Starting ...");

    let args = CliArgs::parse();

    let db_config = args.db_config();
    let pool = db::connect(&db_config)
        .await
        .context("Could not load the database")?;

    db::migrate(&pool)
        .await
        .context("Could not migrate the database")?;

    let server_config = ServerConfig::new(
        args.socket_address(),
        args.error_verbosity,
        args.trace_response_body,
    );
    let server = Server::new(server_config, Arc::new(PgBookStore::new(pool)));

    server.run().await?;

    Ok(())
}
