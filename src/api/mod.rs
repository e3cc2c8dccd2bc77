mod ffz;
mod helix;
mod reddit;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Response;
use serde_json::Value;
use thiserror::Error;

pub use ffz::FrankerFaceZClient;
pub use helix::HelixClient;
pub use reddit::RedditJokes;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Bad response ({0}): {1}")]
    BadResponse(u16, String),
    #[error("Missing response JSON field {0:?} in {1}")]
    MissingResponseJSONField(String, String),
    #[error("Parsing error: {0}")]
    SerdeJSONParsingError(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// A shareable clip: display title and link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub title: String,
    pub url: String,
}

/// The platform's public REST API, as far as the commands need it.
#[async_trait]
pub trait TwitchApi: Send + Sync {
    async fn update_title(&self, title: &str) -> Result<(), ApiError>;
    async fn update_game(&self, game_name: &str) -> Result<(), ApiError>;
    /// Start time of the current broadcast, `None` when offline.
    async fn stream_started_at(&self) -> Result<Option<DateTime<Utc>>, ApiError>;
    /// Login names of everyone currently in chat.
    async fn chatters(&self) -> Result<Vec<String>, ApiError>;
    async fn clips(&self) -> Result<Vec<Clip>, ApiError>;
}

#[async_trait]
pub trait EmoteSource: Send + Sync {
    async fn emote_names(&self) -> Result<Vec<String>, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
    pub title: String,
    pub body: String,
}

#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn jokes(&self) -> Result<Vec<Joke>, ApiError>;
}

fn get_from_json<'a>(val: &'a Value, pointer: &str) -> Result<&'a Value, ApiError> {
    val.pointer(pointer).ok_or_else(|| {
        ApiError::MissingResponseJSONField(pointer.to_owned(), val.to_string())
    })
}

async fn get_json_from_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let response_text = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::BadResponse(status.as_u16(), response_text));
    }
    Ok(serde_json::from_str(&response_text)?)
}
