mod clip;
mod emote;
mod goaway;
mod help;
mod highlight;
mod joke;
mod now_playing;
mod pyramid;
mod stream_info;
mod viewers;

pub use clip::ClipCommand;
pub use emote::EmoteCommand;
pub use goaway::GoAway;
pub use help::Help;
pub use highlight::{FileTimestampSink, Highlight, TimestampSink};
pub use joke::JokeCommand;
pub use now_playing::NowPlaying;
pub use pyramid::{parse_pyramid, Pyramid, PyramidRequest};
pub use stream_info::{Game, Title};
pub use viewers::ViewerWatch;

use crate::{
    api::{EmoteSource, JokeSource, TwitchApi},
    app_config::AppConfig,
    connect::{ChatMessage, ChatSender},
    core::{ArgumentMode, CommandArgs, CommandError, CommandRegistry, CommandSpec, RegistryError},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a handler may touch while it runs.
pub struct CommandContext<'a> {
    pub message: &'a ChatMessage,
    pub sender: &'a ChatSender,
    pub commands: &'a CommandRegistry,
    /// Cancelling ends the bot for good.
    pub shutdown: &'a CancellationToken,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, context: &CommandContext<'_>, args: CommandArgs)
        -> Result<(), CommandError>;
}

/// External services the commands call out to.
#[derive(Clone)]
pub struct Collaborators {
    pub api: Arc<dyn TwitchApi>,
    pub emotes: Arc<dyn EmoteSource>,
    pub jokes: Arc<dyn JokeSource>,
    pub timestamps: Arc<dyn TimestampSink>,
}

pub struct CommandSet {
    pub registry: CommandRegistry,
    /// Also driven by the background emote task.
    pub emote: Arc<EmoteCommand>,
}

pub fn command_set(
    app_config: &AppConfig,
    collaborators: &Collaborators,
) -> Result<CommandSet, RegistryError> {
    let emote = Arc::new(EmoteCommand::new(collaborators.emotes.clone()));
    let api = &collaborators.api;

    let mut registry = CommandRegistry::new();
    registry.register(CommandSpec::new("help", Arc::new(Help)))?;
    registry.register(CommandSpec::new(
        "highlight",
        Arc::new(Highlight::new(api.clone(), collaborators.timestamps.clone())),
    ))?;
    registry.register(CommandSpec::new(
        "np",
        Arc::new(NowPlaying::new(app_config.now_playing_file())),
    ))?;
    registry.register(
        CommandSpec::new("pyramid", Arc::new(Pyramid))
            .with_arguments(ArgumentMode::Custom(parse_pyramid)),
    )?;
    registry.register(CommandSpec::new("emote", emote.clone()))?;
    registry.register(CommandSpec::new("clip", Arc::new(ClipCommand::new(api.clone()))))?;
    registry.register(CommandSpec::new(
        "joke",
        Arc::new(JokeCommand::new(collaborators.jokes.clone())),
    ))?;
    registry.register(
        CommandSpec::new("title", Arc::new(Title::new(api.clone())))
            .with_arguments(ArgumentMode::RawText)
            .privileged(),
    )?;
    registry.register(
        CommandSpec::new("game", Arc::new(Game::new(api.clone())))
            .with_arguments(ArgumentMode::RawText)
            .privileged(),
    )?;
    registry.register(CommandSpec::new("goaway", Arc::new(GoAway)).privileged())?;

    Ok(CommandSet { registry, emote })
}
