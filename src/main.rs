use clap::Parser;
use travel_scout::config::cli::{CliConfig, Command};
use travel_scout::utils::logger;
use travel_scout::{app, config, ScoutError};

fn report(e: &ScoutError) {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 驗證配置
    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            report(&e);
            std::process::exit(e.exit_code());
        }
    };

    match &cli.command {
        Command::Serve { bind, json_logs } => {
            if *json_logs || config.json_logs() {
                logger::init_json_logger(cli.verbose);
            } else {
                logger::init_cli_logger(cli.verbose);
            }
            tracing::info!("Starting travel-scout server");
            if cli.verbose {
                tracing::debug!("Provider settings: {:?}", config.provider());
            }

            if let Err(e) = app::serve(config.as_ref(), bind.as_deref()).await {
                report(&e);
                std::process::exit(e.exit_code());
            }
        }
        Command::Search { query } => {
            logger::init_cli_logger(cli.verbose);
            let query = query.join(" ");

            match app::search_once(config.as_ref(), &query).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(e) => {
                    report(&e);
                    if let Some(details) = e.details() {
                        eprintln!("{}", serde_json::to_string_pretty(&details)?);
                    }
                    std::process::exit(e.exit_code());
                }
            }
        }
    }

    Ok(())
}
