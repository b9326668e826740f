// src/lib.rs
pub mod classifier;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod output;
pub mod probes;
pub mod ratelimit;
pub mod resolver;
pub mod server;
pub mod session;
pub mod types;
pub mod utils;

pub use cli::Args;
pub use engine::OsintEngine;
pub use types::{Config, OsintError, ProbeResult, ProbeStatus, QueryType, SearchReport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
