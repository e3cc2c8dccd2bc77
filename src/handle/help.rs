use super::{CommandContext, CommandHandler};
use crate::core::{CommandArgs, CommandError};
use async_trait::async_trait;

/// Lists the commands the asking user may run.
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn run(&self, context: &CommandContext<'_>, _args: CommandArgs) -> Result<(), CommandError> {
        let names: Vec<String> = context
            .commands
            .names_visible_to(context.message.is_privileged())
            .iter()
            .map(|name| format!("!{}", name))
            .collect();
        context
            .sender
            .action(&format!("Commands: {}", names.join(" ")))
            .await?;
        Ok(())
    }
}
