use super::{ApiError, Joke, JokeSource};
use crate::connect::ExponentialRetryManager;
use async_trait::async_trait;
use futures_retry::FutureRetry;
use serde::Deserialize;

const REDDIT_URL: &str = "https://www.reddit.com/r";
const MAX_JOKE_BODY_CHARS: usize = 150;

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Deserialize)]
struct Child {
    data: Post,
}

#[derive(Deserialize)]
struct Post {
    title: String,
    #[serde(default)]
    selftext: String,
}

/// Short jokes from the week's top posts of a subreddit.
pub struct RedditJokes {
    client: reqwest::Client,
    subreddit: String,
    user_agent: String,
}

impl RedditJokes {
    pub fn new(subreddit: &str, user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            subreddit: subreddit.to_owned(),
            user_agent: user_agent.to_owned(),
        }
    }
}

fn short_jokes(listing: Listing) -> Vec<Joke> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| child.data)
        .filter(|post| post.selftext.chars().count() < MAX_JOKE_BODY_CHARS)
        .map(|post| Joke {
            title: post.title,
            body: post.selftext,
        })
        .collect()
}

#[async_trait]
impl JokeSource for RedditJokes {
    async fn jokes(&self) -> Result<Vec<Joke>, ApiError> {
        let uri = format!("{}/{}/top.json", REDDIT_URL, self.subreddit);
        let (response, _) = FutureRetry::new(
            || {
                self.client
                    .get(&uri)
                    .header(reqwest::header::USER_AGENT, &self.user_agent)
                    .query(&[("t", "week"), ("limit", "100")])
                    .send()
            },
            ExponentialRetryManager::new("Could not fetch jokes", None, None),
        )
        .await
        .map_err(|err| err.0)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::BadResponse(status.as_u16(), text));
        }
        Ok(short_jokes(response.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_posts_are_skipped() {
        let long_body = "a".repeat(MAX_JOKE_BODY_CHARS);
        let listing: Listing = serde_json::from_str(&format!(
            r#"{{"kind":"Listing","data":{{"after":null,"children":[
                {{"kind":"t3","data":{{"title":"Why?","selftext":"Because.","ups":10}}}},
                {{"kind":"t3","data":{{"title":"Long one","selftext":"{}"}}}},
                {{"kind":"t3","data":{{"title":"Title only"}}}}
            ]}}}}"#,
            long_body
        ))
        .unwrap();
        assert_eq!(
            short_jokes(listing),
            vec![
                Joke {
                    title: "Why?".to_owned(),
                    body: "Because.".to_owned(),
                },
                Joke {
                    title: "Title only".to_owned(),
                    body: String::new(),
                },
            ]
        );
    }
}
