use crate::api::{ApiError, TwitchApi};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Logs the viewer list whenever it changes between polls.
pub struct ViewerWatch {
    api: Arc<dyn TwitchApi>,
    ignored: Vec<String>,
    last_seen: Mutex<Vec<String>>,
}

impl ViewerWatch {
    /// `ignored` names (owner, bot) never count as viewers.
    pub fn new(api: Arc<dyn TwitchApi>, ignored: &[&str]) -> Self {
        Self {
            api,
            ignored: ignored.iter().map(|name| name.to_lowercase()).collect(),
            last_seen: Mutex::default(),
        }
    }

    /// Returns the new list if it differs from the previous poll.
    pub async fn poll(&self) -> Result<Option<Vec<String>>, ApiError> {
        let viewers: Vec<String> = self
            .api
            .chatters()
            .await?
            .into_iter()
            .filter(|viewer| !self.ignored.contains(&viewer.to_lowercase()))
            .collect();
        let mut last_seen = self.last_seen.lock().await;
        if *last_seen == viewers {
            return Ok(None);
        }
        info!("Viewers: {}", viewers.join(", "));
        *last_seen = viewers.clone();
        Ok(Some(viewers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeApi;

    #[tokio::test]
    async fn reports_only_changes() {
        let api = Arc::new(FakeApi::default());
        *api.chatters.lock().unwrap() = vec!["channel".into(), "bot".into(), "alice".into()];
        let watch = ViewerWatch::new(api.clone(), &["Channel", "bot"]);

        assert_eq!(watch.poll().await.unwrap(), Some(vec!["alice".to_owned()]));
        assert_eq!(watch.poll().await.unwrap(), None);

        api.chatters.lock().unwrap().push("bob".into());
        assert_eq!(
            watch.poll().await.unwrap(),
            Some(vec!["alice".to_owned(), "bob".to_owned()])
        );
    }
}
