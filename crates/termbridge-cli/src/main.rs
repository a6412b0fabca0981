mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands, SnomedCommands, VsacCommands};
use output::print_error;
use termbridge_umls::{UmlsClient, UmlsConfig};
use termbridge_vsac::{VsacClient, VsacConfig};

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();
    let api_key = cli
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .context("UMLS API key is required (--api-key or UMLS_API_KEY)")?;

    match &cli.command {
        Commands::Vsac(args) => {
            let mut config = VsacConfig::default();
            if let Some(url) = &cli.vsac_url {
                config = config.with_base_url(url.clone());
            }
            let client = VsacClient::new(&config, api_key)?;
            match &args.command {
                VsacCommands::Search { term } => commands::vsac::search(&client, term, format).await?,
                VsacCommands::View { id } => commands::vsac::view(&client, id).await?,
                VsacCommands::Expand { ids, output } => {
                    commands::vsac::expand(&client, ids, output.as_deref(), format).await?
                }
            }
        }
        Commands::Snomed(args) => {
            let mut config = UmlsConfig::default().with_api_key(api_key);
            if let Some(url) = &cli.umls_url {
                config = config.with_base_url(url.clone());
            }
            let client = UmlsClient::new(config)?;
            match &args.command {
                SnomedCommands::Search { term } => {
                    commands::snomed::search(&client, term, format).await?
                }
                SnomedCommands::Map { cuis, term, output } => {
                    commands::snomed::map(&client, cuis, term, output.as_deref(), format).await?
                }
            }
        }
    }

    Ok(())
}
