use super::{CommandContext, CommandHandler};
use crate::{
    api::TwitchApi,
    core::{CommandArgs, CommandError},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{io, path::PathBuf, sync::Arc};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

/// Durable, append-only storage for highlight timestamps.
#[async_trait]
pub trait TimestampSink: Send + Sync {
    async fn append(&self, line: &str) -> io::Result<()>;
}

pub struct FileTimestampSink {
    path: PathBuf,
}

impl FileTimestampSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TimestampSink for FileTimestampSink {
    async fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", line).as_bytes()).await?;
        file.flush().await
    }
}

/// Formats stream uptime as `H:MM`.
pub fn format_elapsed(started_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - started_at).num_seconds().max(0);
    format!("{}:{:02}", seconds / 3600, seconds / 60 % 60)
}

/// Saves the current stream uptime so the moment can be cut later.
pub struct Highlight {
    api: Arc<dyn TwitchApi>,
    sink: Arc<dyn TimestampSink>,
}

impl Highlight {
    pub fn new(api: Arc<dyn TwitchApi>, sink: Arc<dyn TimestampSink>) -> Self {
        Self { api, sink }
    }
}

#[async_trait]
impl CommandHandler for Highlight {
    async fn run(&self, context: &CommandContext<'_>, _args: CommandArgs) -> Result<(), CommandError> {
        let started_at = self
            .api
            .stream_started_at()
            .await?
            .ok_or_else(|| CommandError::Usage("The stream is offline.".to_owned()))?;
        let timestamp = format_elapsed(started_at, Utc::now());
        self.sink.append(&timestamp).await?;
        context
            .sender
            .action(&format!("Highlight saved at {}", timestamp))
            .await?;
        Ok(())
    }
}
