pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::create_router, openai::OpenAiClient};
pub use config::{EnvConfig, TomlConfig};
pub use crate::core::{inventory::Inventory, search::SearchEngine};
pub use utils::error::{Result, ScoutError};
