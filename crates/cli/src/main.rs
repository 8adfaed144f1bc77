//! Heart Disease Prediction CLI
//!
//! A command-line client for the prediction service: check that it is
//! running, inspect its health, list the model inputs and request
//! predictions for a patient.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{features, predict, service, settings};
use config::Config;
use output::{print_error, OutputFormat};

/// Heart Disease Prediction CLI
#[derive(Parser)]
#[command(name = "hdp")]
#[command(author, version, about = "CLI for the Heart Disease Prediction API", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via HDP_API_URL env var or the config file)
    #[arg(long, env = "HDP_API_URL")]
    pub api_url: Option<String>,

    /// Output format [default: table]
    #[arg(long, short)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the service is running
    Status,

    /// Show per-component service health
    Health,

    /// Predict heart disease risk for one patient
    Predict(predict::PredictArgs),

    /// List the model input features
    Features,

    /// Manage the CLI config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Store the API URL in the config file
    SetUrl {
        /// Base URL of the prediction service
        url: String,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let api_url = config.resolve_api_url(cli.api_url.as_deref());
    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(OutputFormat::from_config)
        })
        .unwrap_or_default();

    match cli.command {
        Commands::Features => features::list_features(format, cli.verbose)?,
        Commands::Config(ConfigCommands::Show) => settings::show(&config, &api_url, format)?,
        Commands::Config(ConfigCommands::SetUrl { url }) => settings::set_url(&url)?,
        Commands::Status => {
            let client = client::ApiClient::new(&api_url)?;
            service::show_status(&client, format).await?;
        }
        Commands::Health => {
            let client = client::ApiClient::new(&api_url)?;
            service::show_health(&client, format).await?;
        }
        Commands::Predict(args) => {
            let client = client::ApiClient::new(&api_url)?;
            predict::run_predict(&client, &args, format, cli.verbose).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
