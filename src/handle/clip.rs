use super::{CommandContext, CommandHandler};
use crate::{
    api::{Clip, TwitchApi},
    core::{CommandArgs, CommandError, DrawCache, DrawMode},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Links a random clip of the channel. Clips are not repeated until every
/// cached clip has been shown.
pub struct ClipCommand {
    api: Arc<dyn TwitchApi>,
    cache: DrawCache<Clip>,
}

impl ClipCommand {
    pub fn new(api: Arc<dyn TwitchApi>) -> Self {
        Self {
            api,
            cache: DrawCache::new(DrawMode::WithoutReplacement),
        }
    }
}

#[async_trait]
impl CommandHandler for ClipCommand {
    async fn run(&self, context: &CommandContext<'_>, _args: CommandArgs) -> Result<(), CommandError> {
        match self.cache.draw(|| self.api.clips()).await? {
            Some(clip) => {
                context
                    .sender
                    .say(&format!("{} {}", clip.title, clip.url))
                    .await?
            }
            None => context.sender.action("No clips yet.").await?,
        }
        Ok(())
    }
}
