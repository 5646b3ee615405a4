// Canopy Assist - branded Q&A relay
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use canopy_assist::cli::{ChatRepl, Cli, Commands};
use canopy_assist::client::ApiClient;
use canopy_assist::config::load_config;
use canopy_assist::providers::OpenAiProvider;
use canopy_assist::server::RelayServer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("canopy_assist=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = load_config()?;
            if config.api_key.is_none() {
                tracing::warn!(
                    "OPENAI_API_KEY is not set; requests will fail with a configuration error \
                     until it is configured"
                );
            }

            let provider = Arc::new(OpenAiProvider::new(
                config.api_key.clone(),
                config.model.clone(),
            )?);

            RelayServer::new(&config, provider)?.serve().await
        }
        Commands::Chat { url } => {
            let client = ApiClient::new(url)?;
            ChatRepl::new(client).run().await
        }
        Commands::Ask { question, url } => {
            let client = ApiClient::new(url)?;
            match client.ask(&question).await {
                Ok(reply) => {
                    println!("{}", reply.answer);
                    Ok(())
                }
                Err(message) => {
                    eprintln!("{}", message);
                    std::process::exit(1);
                }
            }
        }
    }
}
