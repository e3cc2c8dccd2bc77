use super::{CommandContext, CommandHandler};
use crate::{
    api::{ApiError, TwitchApi},
    core::{CommandArgs, CommandError},
};
use async_trait::async_trait;
use std::sync::Arc;

fn text_argument(args: CommandArgs, usage: &str) -> Result<String, CommandError> {
    match args {
        CommandArgs::Text(text) if !text.is_empty() => Ok(text),
        _ => Err(CommandError::Usage(usage.to_owned())),
    }
}

/// `!title <text>`
pub struct Title {
    api: Arc<dyn TwitchApi>,
}

impl Title {
    pub fn new(api: Arc<dyn TwitchApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommandHandler for Title {
    async fn run(&self, context: &CommandContext<'_>, args: CommandArgs) -> Result<(), CommandError> {
        let title = text_argument(args, "Usage: !title <text>")?;
        self.api.update_title(&title).await?;
        context.sender.action(&format!("Title set to: {}", title)).await?;
        Ok(())
    }
}

/// `!game <name>`
pub struct Game {
    api: Arc<dyn TwitchApi>,
}

impl Game {
    pub fn new(api: Arc<dyn TwitchApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommandHandler for Game {
    async fn run(&self, context: &CommandContext<'_>, args: CommandArgs) -> Result<(), CommandError> {
        let game = text_argument(args, "Usage: !game <name>")?;
        match self.api.update_game(&game).await {
            Ok(()) => (),
            Err(ApiError::NotFound(_)) => {
                return Err(CommandError::Usage(format!("Unknown game: {}", game)))
            }
            Err(err) => return Err(err.into()),
        }
        context.sender.action(&format!("Game set to: {}", game)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::testing::FakeApi,
        connect::{testing::mock_transport, ChatMessage, ChatSender, Privilege},
        core::CommandRegistry,
    };
    use tokio_util::sync::CancellationToken;

    async fn run(
        handler: &dyn CommandHandler,
        args: CommandArgs,
    ) -> (Result<(), CommandError>, Vec<String>) {
        let (_, writer, sent) = mock_transport(&[]);
        let sender = ChatSender::new(Box::new(writer), "channel");
        let message = ChatMessage::new("channel", "", Some(Privilege::Owner));
        let commands = CommandRegistry::new();
        let shutdown = CancellationToken::new();
        let context = CommandContext {
            message: &message,
            sender: &sender,
            commands: &commands,
            shutdown: &shutdown,
        };
        let result = handler.run(&context, args).await;
        (result, sent.chat())
    }

    #[tokio::test]
    async fn title_is_updated() {
        let api = Arc::new(FakeApi::default());
        let (result, replies) = run(
            &Title::new(api.clone()),
            CommandArgs::Text("Speedrun".to_owned()),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(*api.updates.lock().unwrap(), vec!["title=Speedrun"]);
        assert_eq!(replies, vec!["/me Title set to: Speedrun"]);
    }

    #[tokio::test]
    async fn empty_title_is_a_usage_error() {
        let api = Arc::new(FakeApi::default());
        let (result, _) = run(&Title::new(api.clone()), CommandArgs::Text(String::new())).await;
        assert!(matches!(result, Err(CommandError::Usage(_))));
        assert!(api.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_game_is_a_usage_error() {
        let api = Arc::new(FakeApi {
            known_games: vec!["Celeste".to_owned()],
            ..FakeApi::default()
        });
        let (result, _) = run(&Game::new(api.clone()), CommandArgs::Text("Celest".to_owned())).await;
        assert!(matches!(result, Err(CommandError::Usage(usage)) if usage == "Unknown game: Celest"));
        let (result, _) = run(&Game::new(api.clone()), CommandArgs::Text("Celeste".to_owned())).await;
        assert!(result.is_ok());
        assert_eq!(*api.updates.lock().unwrap(), vec!["game=Celeste"]);
    }

    #[tokio::test]
    async fn api_failures_are_not_usage_errors() {
        let api = Arc::new(FakeApi {
            fail: true,
            ..FakeApi::default()
        });
        let (result, replies) = run(&Title::new(api), CommandArgs::Text("x".to_owned())).await;
        assert!(matches!(result, Err(CommandError::Api(_))));
        assert!(replies.is_empty());
    }
}
