//! The `thumbnail serve` command.

use clap::Args;
use std::net::SocketAddr;
use thumbnail_core::{Config, Ingress};

use crate::server::{self, AppState};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let addr = match args.bind {
        Some(addr) => addr,
        None => config.server.bind.parse()?,
    };

    // The pipeline never creates directories; the service prepares its own.
    for ingress in Ingress::ALL {
        let dir = config.storage_dir(ingress);
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)?;
            tracing::info!("Created {} storage directory: {}", ingress, dir.display());
        }
    }

    let state = AppState::new(config)?;
    server::serve(state, addr).await
}
