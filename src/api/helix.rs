use super::{ApiError, Clip, TwitchApi};
use crate::connect::ExponentialRetryManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_retry::FutureRetry;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

const HELIX_URL: &str = "https://api.twitch.tv/helix";
const MAX_CHATTERS_PAGE: &str = "1000";
const MAX_CLIPS_PAGE: &str = "100";

#[derive(Deserialize)]
struct Page<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct Game {
    id: String,
}

#[derive(Deserialize)]
struct Stream {
    started_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Chatter {
    user_login: String,
}

#[derive(Deserialize)]
struct HelixClip {
    title: String,
    url: String,
}

/// Client for the Helix API acting on behalf of the channel owner.
pub struct HelixClient {
    client: reqwest::Client,
    client_id: String,
    access_token: String,
    broadcaster_id: String,
}

impl HelixClient {
    pub fn new(client_id: &str, access_token: &str, broadcaster_id: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.to_owned(),
            access_token: access_token.trim_start_matches("oauth:").to_owned(),
            broadcaster_id: broadcaster_id.to_owned(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", HELIX_URL, path))
            .header("Client-Id", &self.client_id)
            .bearer_auth(&self.access_token)
    }

    async fn send<F>(&self, description: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let (response, _) = FutureRetry::new(
            || build().send(),
            ExponentialRetryManager::new(description, None, None),
        )
        .await
        .map_err(|err| err.0)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::BadResponse(status.as_u16(), text));
        }
        Ok(response)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let response = self
            .send(&format!("Could not get {}", path), || {
                self.request(Method::GET, path).query(query)
            })
            .await?;
        Ok(response.json::<Page<T>>().await?.data)
    }

    async fn modify_channel(&self, body: serde_json::Value) -> Result<(), ApiError> {
        self.send("Could not modify channel information", || {
            self.request(Method::PATCH, "channels")
                .query(&[("broadcaster_id", self.broadcaster_id.as_str())])
                .json(&body)
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TwitchApi for HelixClient {
    async fn update_title(&self, title: &str) -> Result<(), ApiError> {
        self.modify_channel(json!({ "title": title })).await
    }

    async fn update_game(&self, game_name: &str) -> Result<(), ApiError> {
        let games: Vec<Game> = self.get_data("games", &[("name", game_name)]).await?;
        let game = games
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("game {:?}", game_name)))?;
        self.modify_channel(json!({ "game_id": game.id })).await
    }

    async fn stream_started_at(&self) -> Result<Option<DateTime<Utc>>, ApiError> {
        let streams: Vec<Stream> = self
            .get_data("streams", &[("user_id", self.broadcaster_id.as_str())])
            .await?;
        Ok(streams.into_iter().next().map(|stream| stream.started_at))
    }

    async fn chatters(&self) -> Result<Vec<String>, ApiError> {
        let chatters: Vec<Chatter> = self
            .get_data(
                "chat/chatters",
                &[
                    ("broadcaster_id", self.broadcaster_id.as_str()),
                    ("moderator_id", self.broadcaster_id.as_str()),
                    ("first", MAX_CHATTERS_PAGE),
                ],
            )
            .await?;
        Ok(chatters.into_iter().map(|chatter| chatter.user_login).collect())
    }

    async fn clips(&self) -> Result<Vec<Clip>, ApiError> {
        let clips: Vec<HelixClip> = self
            .get_data(
                "clips",
                &[
                    ("broadcaster_id", self.broadcaster_id.as_str()),
                    ("first", MAX_CLIPS_PAGE),
                ],
            )
            .await?;
        Ok(clips
            .into_iter()
            .map(|clip| Clip {
                title: clip.title,
                url: clip.url,
            })
            .collect())
    }
}
