use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use chrono::Duration;

use crate::{
    cli::{Cli, Command},
    client::ChatClient,
    domain::registry::{ChatRegistry, ChatSettings},
    infra::{self, config::AppConfig, store},
    server::transport,
};

pub fn run(cli: Cli) -> Result<()> {
    let config = infra::config::load(cli.config.as_deref())?;
    infra::logging::init(&config.logging)?;

    let host = cli.host.clone().unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    match cli.command_or_default() {
        Command::Serve => runtime.block_on(serve(&config, host, port)),
        Command::Client { name } => {
            runtime.block_on(ChatClient::new(name, host, port).run_session())
        }
    }
}

async fn serve(config: &AppConfig, host: String, port: u16) -> Result<()> {
    let settings = ChatSettings {
        shared_history_limit: config.chat.shared_history_limit,
        actuality_period: Duration::hours(config.chat.actuality_period_hours),
    };
    let state_path = &config.storage.state_path;

    // A restored snapshot also restores the address it was saved under.
    let (host, port, registry) = match store::load(state_path, &settings) {
        Ok(Some(state)) => {
            tracing::info!(path = %state_path.display(), "restored state snapshot");
            (state.host, state.port, state.registry)
        }
        Ok(None) => {
            tracing::info!(path = %state_path.display(), "no state snapshot, starting empty");
            (host, port, ChatRegistry::new(settings))
        }
        Err(error) => {
            tracing::error!(error = %error, "state snapshot is unreadable, starting empty");
            (host, port, ChatRegistry::new(settings))
        }
    };

    let registry = Arc::new(Mutex::new(registry));
    let listener = transport::bind(&host, port).await?;

    tokio::select! {
        result = transport::serve(listener, Arc::clone(&registry)) => result?,
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for shutdown signal")?;
            tracing::info!("shutdown signal received");
        }
    }

    let registry = registry
        .lock()
        .map_err(|_| anyhow!("registry lock poisoned"))?;
    store::save(state_path, &host, port, &registry)?;
    tracing::info!(path = %state_path.display(), "state snapshot saved");
    Ok(())
}
