use super::command::{CommandError, CommandRegistry};
use crate::{
    connect::{ChatMessage, ChatSender},
    handle::CommandContext,
};
use log::{error, info};
use tokio_util::sync::CancellationToken;

pub const HELP_COMMAND: &str = "help";

/// Splits `!name rest` into the command name and its raw argument text.
/// Anything else is not a command attempt.
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('!')?;
    let name_end = body
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    if name_end == 0 {
        return None;
    }
    let (name, rest) = body.split_at(name_end);
    match rest.chars().next() {
        None => Some((name, "")),
        Some(c) if c.is_whitespace() => Some((name, rest.trim())),
        Some(_) => None,
    }
}

/// Routes chat messages to the registered commands.
pub struct Dispatcher {
    bot_user_name: String,
    reactions: Vec<(String, String)>,
    commands: CommandRegistry,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(bot_user_name: &str, commands: CommandRegistry, shutdown: CancellationToken) -> Self {
        Self {
            bot_user_name: bot_user_name.to_owned(),
            reactions: Vec::new(),
            commands,
            shutdown,
        }
    }

    /// Answers a message that is exactly `trigger` with `reply`.
    pub fn with_reaction(mut self, trigger: &str, reply: &str) -> Self {
        self.reactions.push((trigger.to_owned(), reply.to_owned()));
        self
    }

    pub async fn dispatch(&self, message: &ChatMessage, sender: &ChatSender) {
        if message.sender.eq_ignore_ascii_case(&self.bot_user_name) {
            return;
        }

        if let Some((_, reply)) = self
            .reactions
            .iter()
            .find(|(trigger, _)| *trigger == message.text)
        {
            if let Err(err) = sender.say(reply).await {
                error!("Could not send reaction: {}", err);
            }
            return;
        }

        let (name, rest) = match parse_command(&message.text) {
            Some(command) => command,
            None => return,
        };

        let (spec, rest) = match self.commands.get(name) {
            Some(spec) => (spec, rest),
            None => match self.commands.get(HELP_COMMAND) {
                Some(help) => (help, ""),
                None => return,
            },
        };

        if spec.requires_privilege && !message.is_privileged() {
            info!(
                "{} lacks the privilege to execute !{}",
                message.sender, spec.name
            );
            return;
        }

        let context = CommandContext {
            message,
            sender,
            commands: &self.commands,
            shutdown: &self.shutdown,
        };
        let result = match spec.argument_mode.parse(rest) {
            Ok(args) => spec.handler.run(&context, args).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => (),
            Err(CommandError::Usage(usage)) => {
                if let Err(err) = sender.action(&usage).await {
                    error!("Could not send usage for !{}: {}", spec.name, err);
                }
            }
            Err(err) => error!("Command !{} failed: {}", spec.name, err),
        }
    }
}
