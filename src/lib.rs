pub mod analytics;
pub mod api;
pub mod config;
pub mod database;
pub mod service;
pub mod types;

pub use config::Config;
pub use types::*;
