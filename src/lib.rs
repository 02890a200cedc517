pub mod cli_args;
pub mod db;
pub mod error;
mod extractor;
mod middleware;
mod openapi;
mod route;
pub mod server;
mod state;
pub mod store;
pub mod types;
mod utils;
