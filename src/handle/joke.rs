use super::{CommandContext, CommandHandler};
use crate::{
    api::{Joke, JokeSource},
    core::{CommandArgs, CommandError, DrawCache, DrawMode},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Tells a short joke. No joke repeats until the fetched batch is used up.
pub struct JokeCommand {
    source: Arc<dyn JokeSource>,
    cache: DrawCache<Joke>,
}

impl JokeCommand {
    pub fn new(source: Arc<dyn JokeSource>) -> Self {
        Self {
            source,
            cache: DrawCache::new(DrawMode::WithoutReplacement),
        }
    }
}

#[async_trait]
impl CommandHandler for JokeCommand {
    async fn run(&self, context: &CommandContext<'_>, _args: CommandArgs) -> Result<(), CommandError> {
        match self.cache.draw(|| self.source.jokes()).await? {
            Some(joke) => {
                let text = format!("{} {}", joke.title, joke.body);
                context.sender.say(text.trim_end()).await?
            }
            None => context.sender.action("No jokes today.").await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::testing::FakeJokes,
        connect::{testing::mock_transport, ChatMessage, ChatSender},
        core::CommandRegistry,
    };
    use tokio_util::sync::CancellationToken;

    fn joke(title: &str, body: &str) -> Joke {
        Joke {
            title: title.to_owned(),
            body: body.to_owned(),
        }
    }

    async fn tell(command: &JokeCommand, times: usize) -> Vec<String> {
        let (_, writer, sent) = mock_transport(&[]);
        let sender = ChatSender::new(Box::new(writer), "channel");
        let message = ChatMessage::new("alice", "!joke", None);
        let commands = CommandRegistry::new();
        let shutdown = CancellationToken::new();
        let context = CommandContext {
            message: &message,
            sender: &sender,
            commands: &commands,
            shutdown: &shutdown,
        };
        for _ in 0..times {
            command.run(&context, CommandArgs::None).await.unwrap();
        }
        sent.chat()
    }

    #[tokio::test]
    async fn jokes_do_not_repeat_within_a_batch() {
        let source = Arc::new(FakeJokes {
            jokes: vec![
                joke("Why did the chicken cross the road?", "To get to the\nother side."),
                joke("Knock knock.", ""),
            ],
            ..FakeJokes::default()
        });
        let command = JokeCommand::new(source.clone());

        let mut told = tell(&command, 2).await;
        told.sort();
        assert_eq!(
            told,
            vec![
                "Knock knock.",
                "Why did the chicken cross the road? To get to the other side.",
            ]
        );
        assert_eq!(*source.fetches.lock().unwrap(), 1);

        tell(&command, 1).await;
        assert_eq!(*source.fetches.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn no_jokes_is_reported() {
        let command = JokeCommand::new(Arc::new(FakeJokes::default()));
        assert_eq!(tell(&command, 1).await, vec!["/me No jokes today."]);
    }
}
