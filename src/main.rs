use anyhow::{ Context, Result };
use clap::Parser;
use log::{ error, info };

use stellar_checker::config::CheckerConfig;

mod cli;
use cli::{ CheckerCli, Commands };

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry GITHUB_TOKEN; it must be loaded before clap reads the environment
    dotenv::dotenv().ok();

    // Parse the command line arguments
    let cli = CheckerCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    println!("Stellar Checker - theme verification for submitted sites");

    let config = match CheckerConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Could not load {}: {}", cli.config.display(), e);
            cli::ui::print_error(&format!("Could not load {}: {}", cli.config.display(), e));
            return Err(e).with_context(|| format!("loading {}", cli.config.display()));
        }
    };
    info!(
        "Loaded config for {} (label filter: {:?}, timeout: {:?})",
        config.repository(),
        config.label_filter(),
        config.request_timeout()
    );

    match &cli.command {
        Commands::Check { token, dry_run } => {
            cli::commands::check::execute(&config, token.as_deref(), *dry_run).await?;
        }
        Commands::Scrape { output } => {
            cli::commands::scrape::execute(&config, *output).await?;
        }
        Commands::Verify { url } => {
            cli::commands::verify::execute(&config, url).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
