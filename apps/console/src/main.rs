use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{
    endpoint_url, AuthorizationError, AuthorizationState, AuthorizationStore,
    BroadcastDispatcher, HttpRpcTransport, PlatformManagerActions,
};
use shared::action::{Action, ActionType};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

mod config;

#[derive(Parser, Debug)]
#[command(name = "platform-console", about = "Authorize against a platform manager")]
struct Args {
    #[arg(long, default_value = "platform-console.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    username: String,
    #[arg(long, env = "PLATFORM_PASSWORD", hide_env_values = true)]
    password: String,
    /// Clear the authorization again once it has been granted.
    #[arg(long)]
    clear: bool,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn print_actions(mut receiver: Receiver<Action>) {
    loop {
        match receiver.recv().await {
            Ok(action) => match serde_json::to_string(&action) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("failed to encode action {}: {err}", action.action_type()),
            },
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "action printer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn run(args: Args, settings: Settings) -> Result<AuthorizationState> {
    let endpoint = endpoint_url(&settings.server_url, &settings.rpc_path)?;
    info!(endpoint = %endpoint, "using platform rpc endpoint");
    let transport = Arc::new(
        HttpRpcTransport::new(endpoint, settings.request_timeout())
            .context("failed to set up rpc transport")?,
    );
    let dispatcher = Arc::new(BroadcastDispatcher::with_capacity(
        settings.dispatch_capacity,
    ));
    let store = AuthorizationStore::new();
    let printer = tokio::spawn(print_actions(dispatcher.subscribe()));
    let store_task = store.spawn(dispatcher.subscribe());

    let actions = PlatformManagerActions::new(transport, dispatcher.clone());
    let outcome = actions
        .spawn_request_authorization(args.username, args.password)
        .wait()
        .await;
    if args.clear && matches!(outcome, Ok(ActionType::RequestAuthorizationSuccess)) {
        actions.clear_authorization();
    }

    drop(actions);
    drop(dispatcher);
    printer.await.context("action printer failed")?;
    store_task.await.context("authorization store failed")?;

    match outcome {
        Err(AuthorizationError::Unhandled(err)) => {
            return Err(err.context("authorization request failed"))
        }
        Err(err) => return Err(err.into()),
        Ok(_) => {}
    }

    let state = store.snapshot().await;
    if let Some(error) = &state.last_error {
        return Err(anyhow!("authorization rejected: {error}"));
    }
    if state.is_authorized() {
        info!("authorization granted");
    } else {
        info!("authorization cleared");
    }
    Ok(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = Args::parse();
    let mut settings = config::load_settings(&args.config);
    if let Some(server_url) = args.server_url.take() {
        settings.server_url = server_url;
    }
    init_tracing(&settings.log_filter);

    run(args, settings).await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
