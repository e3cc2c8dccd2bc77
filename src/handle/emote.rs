use super::{CommandContext, CommandHandler};
use crate::{
    api::EmoteSource,
    connect::ChatSender,
    core::{CommandArgs, CommandError, DrawCache, DrawMode},
};
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;

/// Posts a random channel emote. Emotes are drawn with replacement, so the
/// emote list is fetched only once.
pub struct EmoteCommand {
    source: Arc<dyn EmoteSource>,
    cache: DrawCache<String>,
}

impl EmoteCommand {
    pub fn new(source: Arc<dyn EmoteSource>) -> Self {
        Self {
            source,
            cache: DrawCache::new(DrawMode::WithReplacement),
        }
    }

    pub async fn post_random(&self, sender: &ChatSender) -> Result<(), CommandError> {
        match self.cache.draw(|| self.source.emote_names()).await? {
            Some(emote) => sender.say(&emote).await?,
            None => warn!("The channel has no emotes to post"),
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for EmoteCommand {
    async fn run(&self, context: &CommandContext<'_>, _args: CommandArgs) -> Result<(), CommandError> {
        self.post_random(context.sender).await
    }
}
