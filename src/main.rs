//! Command line access to a 3X-UI panel.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use xui_handler::config::Config;
use xui_handler::infrastructure::observability;
use xui_handler::infrastructure::runtime::TokioTaskSpawner;
use xui_handler::services::ProductionInbounds;
use xui_handler::shared::instance;
use xui_handler::shared::utils::identity::random_uuid;
use xui_handler::XuiClient;

/// Query a 3X-UI panel configured through the environment (or `.env`)
#[derive(Parser)]
#[command(name = "xui-handler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(short, long, default_value = "xui_handler=info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all inbounds
    Inbounds,

    /// Show one inbound
    Inbound { id: i64 },

    /// Show the inbounds whose remark carries the production marker
    ProdInbounds {
        /// Keep refreshing the selection until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// Look up a client by email
    ClientEmail { email: String },

    /// Look up a client by uuid
    ClientUuid {
        uuid: String,

        /// Print the record of every inbound the client is in
        #[arg(long)]
        all: bool,
    },

    /// Ask the panel for a fresh uuid
    NewUuid {
        /// Generate it locally instead
        #[arg(long)]
        local: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load panel configuration")?;
    observability::init(&config, &cli.log_level)
        .map_err(|e| anyhow::anyhow!("Failed to initialize observability: {}", e))?;
    info!("Configuration loaded for {}", config.base_url());

    let client = instance::install(XuiClient::new(config)?).await;
    client.login().await.context("Failed to log in to the panel")?;

    let outcome = run(&client, cli.command).await;
    client.disconnect().await;
    outcome
}

async fn run(client: &Arc<XuiClient>, command: Commands) -> Result<()> {
    match command {
        Commands::Inbounds => print_json(&client.inbounds().get_all_inbounds().await?),
        Commands::Inbound { id } => {
            print_json(&client.inbounds().get_specific_inbound(id).await?)
        }
        Commands::ProdInbounds { watch } => {
            let production = Arc::new(ProductionInbounds::new(client.clone()));
            print_json(&production.get().await?)?;
            if watch {
                let interval = client.config().prod_refresh_interval();
                let token = production
                    .clone()
                    .start_refresher(&TokioTaskSpawner::new(), interval)?;
                info!("Refreshing production inbounds every {:?}", interval);
                tokio::signal::ctrl_c().await?;
                token.cancel();
            }
            Ok(())
        }
        Commands::ClientEmail { email } => {
            print_json(&client.clients().get_client_with_email(&email).await?)
        }
        Commands::ClientUuid { uuid, all } => {
            if all {
                print_json(&client.clients().get_client_traffics_with_uuid(&uuid).await?)
            } else {
                print_json(&client.clients().get_client_with_uuid(&uuid).await?)
            }
        }
        Commands::NewUuid { local } => {
            let uuid = if local {
                random_uuid()
            } else {
                client.server().new_uuid().await?
            };
            println!("{}", uuid);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
