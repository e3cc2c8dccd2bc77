use super::{CommandContext, CommandHandler};
use crate::core::{CommandArgs, CommandError};
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;

const NOT_AVAILABLE: &str = "N/A";

/// Reads the current track from a file kept up to date by the media player.
pub struct NowPlaying {
    file: Option<PathBuf>,
}

impl NowPlaying {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    async fn current_track(&self) -> Option<String> {
        let path = self.file.as_ref()?;
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) => {
                debug!("Could not read {}: {}", path.display(), err);
                return None;
            }
        };
        contents
            .trim_start_matches('\u{feff}')
            .lines()
            .next()
            .map(str::trim)
            .filter(|track| !track.is_empty())
            .map(String::from)
    }
}

#[async_trait]
impl CommandHandler for NowPlaying {
    async fn run(&self, context: &CommandContext<'_>, _args: CommandArgs) -> Result<(), CommandError> {
        let message = match self.current_track().await {
            Some(track) => format!("Now playing: {}", track),
            None => NOT_AVAILABLE.to_owned(),
        };
        context.sender.action(&message).await?;
        Ok(())
    }
}
