use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use contact_server::cli::Cli;
use contact_server::{init_logging, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
        config.validate()?;
    }

    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind(config.socket_addr()?)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;

    info!(
        addr = %listener.local_addr()?,
        backend = ?config.mail.backend,
        owner = %config.owner.email,
        "contact relay listening"
    );
    contact_server::serve(listener, state).await?;
    Ok(())
}
