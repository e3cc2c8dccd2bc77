use super::{Dispatcher, RegistryError, ScheduledTask};
use crate::{
    app_config::AppConfig,
    connect::{ChatSender, ConnectorError, Dialer, ExponentialRetryManager, TwitchChatConnector},
    handle::{command_set, Collaborators, EmoteCommand, ViewerWatch},
};
use futures_retry::{ErrorHandler, RetryPolicy};
use log::info;
use std::{sync::Arc, time::Duration};
use tokio::time;
use tokio_util::sync::CancellationToken;

const GREETING: &str = "Hi!";

/// How a session that made it into the channel came to an end.
#[derive(Debug)]
pub enum SessionEnd {
    Shutdown,
    /// The connection was lost after joining.
    Dropped(ConnectorError),
}

/// Owns the command table and runs chat sessions, one connection at a time.
pub struct ChatBot {
    app_config: Arc<AppConfig>,
    dialer: Arc<dyn Dialer>,
    dispatcher: Dispatcher,
    emote: Arc<EmoteCommand>,
    collaborators: Collaborators,
    shutdown: CancellationToken,
}

impl ChatBot {
    pub fn new(
        app_config: Arc<AppConfig>,
        dialer: Arc<dyn Dialer>,
        collaborators: Collaborators,
        shutdown: CancellationToken,
    ) -> Result<Self, RegistryError> {
        let commands = command_set(&app_config, &collaborators)?;
        info!(
            "Commands: {}",
            commands.registry.names_visible_to(true).join(" ")
        );
        let dispatcher = Dispatcher::new(
            app_config.bot_user_name(),
            commands.registry,
            shutdown.clone(),
        )
        .with_reaction("PogChamp", "ChampPog")
        .with_reaction("ChampPog", "PogChamp");
        Ok(Self {
            app_config,
            dialer,
            dispatcher,
            emote: commands.emote,
            collaborators,
            shutdown,
        })
    }

    /// Runs sessions until shutdown is requested. Attempts that never reach
    /// the channel back off through `reconnect`; a session that joined starts
    /// the backoff over.
    pub async fn run(&self, mut reconnect: ExponentialRetryManager) -> Result<(), ConnectorError> {
        let mut attempt = 0;
        loop {
            let err = match self.run_session().await {
                Ok(SessionEnd::Shutdown) => return Ok(()),
                Ok(SessionEnd::Dropped(err)) => {
                    attempt = 1;
                    err
                }
                Err(err) => {
                    attempt += 1;
                    err
                }
            };
            let wait = match reconnect.handle(attempt, err) {
                RetryPolicy::WaitRetry(wait) => wait,
                RetryPolicy::Repeat => Duration::ZERO,
                RetryPolicy::ForwardError(err) => return Err(err),
            };
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return Ok(()),
                _ = time::sleep(wait) => (),
            }
        }
    }

    /// Connects, serves chat until the connection drops or a shutdown is
    /// requested, then stops all background tasks.
    ///
    /// An error means the channel was never joined.
    pub async fn run_session(&self) -> Result<SessionEnd, ConnectorError> {
        if self.shutdown.is_cancelled() {
            return Ok(SessionEnd::Shutdown);
        }
        let mut connector = TwitchChatConnector::new(self.app_config.channel_name());
        connector
            .join(
                self.dialer.as_ref(),
                (self.app_config.chat_host(), self.app_config.chat_port()),
                self.app_config.chat_oauth(),
                self.app_config.bot_user_name(),
            )
            .await?;
        let sender = connector.sender()?;

        let tasks = self.schedule_background_tasks(&sender);
        let result = self.serve(&mut connector, &sender).await;
        for task in tasks {
            task.shutdown().await;
        }
        connector.close().await;
        info!("Chat session ended");
        Ok(match result {
            Ok(()) => SessionEnd::Shutdown,
            Err(err) => SessionEnd::Dropped(err),
        })
    }

    async fn serve(
        &self,
        connector: &mut TwitchChatConnector,
        sender: &ChatSender,
    ) -> Result<(), ConnectorError> {
        sender.say(GREETING).await?;
        loop {
            let messages = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return Ok(()),
                messages = connector.recv_messages() => messages?,
            };
            for message in messages {
                info!("{}: {}", message.sender, message.text);
                self.dispatcher.dispatch(&message, sender).await;
                if self.shutdown.is_cancelled() {
                    return Ok(());
                }
            }
        }
    }

    fn schedule_background_tasks(&self, sender: &ChatSender) -> Vec<ScheduledTask> {
        let mut tasks = Vec::new();

        if let Some(interval) = self.app_config.emote_interval() {
            let emote = self.emote.clone();
            let sender = sender.clone();
            tasks.push(ScheduledTask::spawn("emotes", interval, move || {
                let emote = emote.clone();
                let sender = sender.clone();
                async move { emote.post_random(&sender).await }
            }));
        }

        if let Some(interval) = self.app_config.viewer_poll_interval() {
            let watch = Arc::new(ViewerWatch::new(
                self.collaborators.api.clone(),
                &[
                    self.app_config.channel_name(),
                    self.app_config.bot_user_name(),
                ],
            ));
            tasks.push(ScheduledTask::spawn("viewers", interval, move || {
                let watch = watch.clone();
                async move { watch.poll().await.map(|_| ()) }
            }));
        }

        for task in &tasks {
            info!("Running {} every {}s", task.name(), task.interval().as_secs_f64());
        }
        tasks
    }
}
