pub mod env_config;
pub mod toml_config;

pub use env_config::EnvConfig;
pub use toml_config::TomlConfig;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;

/// Load configuration from `path` when given, otherwise from the environment,
/// and validate it. A placeholder API key is rejected here, before anything
/// binds or calls the provider.
pub fn load(path: Option<&str>) -> Result<Box<dyn ConfigProvider>> {
    let config: Box<dyn ConfigProvider> = match path {
        Some(path) => Box::new(TomlConfig::from_file(path)?),
        None => Box::new(EnvConfig::from_env()?),
    };
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "cli")]
pub mod cli {
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "travel-scout")]
    #[command(about = "Grounded natural-language search over a fixed travel package inventory")]
    pub struct CliConfig {
        /// TOML config file; when omitted, configuration comes from the environment
        #[arg(long, global = true, env = "SCOUT_CONFIG")]
        pub config: Option<String>,

        #[arg(long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Run the HTTP search service
        Serve {
            /// Overrides the configured bind address
            #[arg(long)]
            bind: Option<String>,

            #[arg(long, help = "Emit JSON log lines")]
            json_logs: bool,
        },
        /// Run one search and print the result as JSON
        Search {
            #[arg(required = true, num_args = 1..)]
            query: Vec<String>,
        },
    }
}
