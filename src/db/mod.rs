//! Database handle: connection setup and schema reconciliation.

mod connection;
mod schema;

pub use connection::{connect, DbConfig, SslMode, DEFAULT_MAX_CONNECTIONS};
pub use schema::migrate;
