use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use switchboard::model::IceServerConfig;
use switchboard::server::{DEFAULT_STUN_URL, ServerConfig, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Session signaling server for peer-to-peer calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the signaling server.
    Serve {
        #[arg(long, env = "SWITCHBOARD_BIND")]
        bind: Option<SocketAddr>,

        /// Extra STUN/TURN url handed to clients. Repeatable.
        #[arg(long = "ice-server")]
        ice_servers: Vec<String>,

        /// Do not advertise the public STUN server.
        #[arg(long)]
        no_default_stun: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            bind,
            ice_servers,
            no_default_stun,
        } => {
            let mut config = ServerConfig::from_env().context("Invalid server configuration")?;
            if let Some(bind) = bind {
                config = config.with_bind_addr(bind);
            }
            let mut advertised = config.ice_servers.clone();
            if no_default_stun {
                advertised.retain(|server| server.urls != [DEFAULT_STUN_URL]);
            }
            advertised.extend(ice_servers.into_iter().map(IceServerConfig::stun));
            config = config.with_ice_servers(advertised);

            println!("{}", "Starting Switchboard...".green().bold());
            println!("   Listening: {}", config.bind_addr.to_string().cyan());
            for server in &config.ice_servers {
                println!("   ICE:       {}", server.urls.join(", ").cyan());
            }
            info!("{} ICE servers configured", config.ice_servers.len());

            serve(config).await?;
        }
    }

    Ok(())
}
