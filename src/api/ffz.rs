use super::{get_from_json, get_json_from_response, ApiError, EmoteSource};
use crate::connect::ExponentialRetryManager;
use async_trait::async_trait;
use futures_retry::FutureRetry;
use serde_json::Value;

const FFZ_ROOM_URL: &str = "https://api.frankerfacez.com/v1/room";

/// Emote names of a channel's FrankerFaceZ room.
pub struct FrankerFaceZClient {
    client: reqwest::Client,
    channel: String,
}

impl FrankerFaceZClient {
    pub fn new(channel: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            channel: channel.to_owned(),
        }
    }
}

fn emote_names_from_room(room: &Value) -> Result<Vec<String>, ApiError> {
    let set = get_from_json(room, "/room/set")?;
    let set = match set {
        Value::Number(number) => number.to_string(),
        other => other.as_str().unwrap_or_default().to_owned(),
    };
    let emoticons = get_from_json(room, &format!("/sets/{}/emoticons", set))?;
    Ok(emoticons
        .as_array()
        .map(|emoticons| {
            emoticons
                .iter()
                .filter_map(|emote| emote["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default())
}

#[async_trait]
impl EmoteSource for FrankerFaceZClient {
    async fn emote_names(&self) -> Result<Vec<String>, ApiError> {
        let uri = format!("{}/{}", FFZ_ROOM_URL, self.channel);
        let (response, _) = FutureRetry::new(
            || self.client.get(&uri).send(),
            ExponentialRetryManager::new("Could not fetch emotes", None, None),
        )
        .await
        .map_err(|err| err.0)?;
        let json = get_json_from_response(response).await?;
        emote_names_from_room(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracting_emote_names() {
        let room = json!({
            "room": { "set": 1234, "id": "channel" },
            "sets": {
                "1234": {
                    "emoticons": [
                        { "id": 1, "name": "OMEGALUL" },
                        { "id": 2, "name": "monkaS" }
                    ]
                }
            }
        });
        assert_eq!(emote_names_from_room(&room).unwrap(), vec!["OMEGALUL", "monkaS"]);
    }

    #[test]
    fn missing_set_is_an_error() {
        let room = json!({ "room": {}, "sets": {} });
        assert!(matches!(
            emote_names_from_room(&room),
            Err(ApiError::MissingResponseJSONField(..))
        ));
    }
}
