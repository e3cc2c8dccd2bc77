mod api;
mod app_config;
mod connect;
mod core;
mod handle;

use crate::{
    api::{FrankerFaceZClient, HelixClient, RedditJokes},
    app_config::AppConfig,
    connect::{ExponentialRetryManager, TcpDialer},
    core::ChatBot,
    handle::{Collaborators, FileTimestampSink},
};
use env_logger::Env;
use log::{error, info};
use std::{sync::Arc, time::Duration};
use tokio::{signal, time};
use tokio_util::sync::CancellationToken;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let app_config = Arc::new(AppConfig::new()?);
    info!(
        "Connecting to {}:{} as {}",
        app_config.chat_host(),
        app_config.chat_port(),
        app_config.bot_user_name()
    );

    let collaborators = Collaborators {
        api: Arc::new(HelixClient::new(
            app_config.api_client_id(),
            app_config.api_oauth(),
            app_config.user_id(),
        )),
        emotes: Arc::new(FrankerFaceZClient::new(app_config.channel_name())),
        jokes: Arc::new(RedditJokes::new(
            app_config.joke_subreddit(),
            app_config.bot_user_name(),
        )),
        timestamps: Arc::new(FileTimestampSink::new(app_config.highlight_file().clone())),
    };

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            interrupt.cancel();
        }
    });

    let bot = ChatBot::new(
        app_config.clone(),
        Arc::new(TcpDialer),
        collaborators,
        shutdown.clone(),
    )?;
    let run = bot.run(ExponentialRetryManager::unlimited(
        "Chat session ended",
        app_config.reconnect_delay(),
    ));
    tokio::pin!(run);

    let result = tokio::select! {
        result = &mut run => result,
        _ = shutdown.cancelled() => match time::timeout(SHUTDOWN_GRACE, &mut run).await {
            Ok(result) => result,
            Err(_) => Ok(()),
        },
    };
    if let Err(err) = result {
        error!("Giving up: {}", err);
        return Err(err.into());
    }
    info!("Bye");
    Ok(())
}
