use super::{CommandContext, CommandHandler};
use crate::core::{CommandArgs, CommandError};
use async_trait::async_trait;
use log::info;

pub struct GoAway;

#[async_trait]
impl CommandHandler for GoAway {
    async fn run(&self, context: &CommandContext<'_>, _args: CommandArgs) -> Result<(), CommandError> {
        info!("Shutdown requested by {}", context.message.sender);
        context.sender.action("Bye").await?;
        context.shutdown.cancel();
        Ok(())
    }
}
