use super::transport::TransportSender;
use crate::connect::ConnectorError;
use log::info;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

const ACTION_PREFIX: &str = "/me ";

pub fn get_login_tasks(password: &str, user_name: &str, channel: &str) -> Vec<SendTask> {
    vec![
        SendTask::ProvideLoginPassword(password.to_string()),
        SendTask::ProvideLoginUserName(user_name.to_string()),
        SendTask::RequestCapabilities("tags".to_string()),
        SendTask::JoinChannel(channel.to_string()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendTask {
    PrivateMessage(String, String),
    ProvideLoginPassword(String),
    ProvideLoginUserName(String),
    JoinChannel(String),
    RequestCapabilities(String),
    Pong(String),
}

impl fmt::Display for SendTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrivateMessage(channel, message) => write!(f, "PRIVMSG #{} :{}", channel, message),
            // the credential may already carry its scheme
            Self::ProvideLoginPassword(password) if password.starts_with("oauth:") => {
                write!(f, "PASS {}", password)
            }
            Self::ProvideLoginPassword(password) => write!(f, "PASS oauth:{}", password),
            Self::ProvideLoginUserName(user_name) => write!(f, "NICK {}", user_name),
            Self::JoinChannel(channel) => write!(f, "JOIN #{}", channel),
            Self::RequestCapabilities(capability_name) => {
                write!(f, "CAP REQ :twitch.tv/{}", capability_name)
            }
            Self::Pong(server) => write!(f, "PONG :{}", server),
        }
    }
}

/// The shared send path of a connection. Clones write to the same socket,
/// one whole line at a time.
#[derive(Clone)]
pub struct ChatSender {
    writer: Arc<Mutex<Box<dyn TransportSender>>>,
    channel: Arc<str>,
}

impl ChatSender {
    pub fn new(writer: Box<dyn TransportSender>, channel: &str) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            channel: Arc::from(channel),
        }
    }

    pub async fn send_task(&self, task: SendTask) -> Result<(), ConnectorError> {
        let line = format!("{}\r\n", task);
        self.writer.lock().await.send(line.as_bytes()).await
    }

    pub async fn send_multiple(&self, tasks: Vec<SendTask>) -> Result<(), ConnectorError> {
        for task in tasks {
            self.send_task(task).await?;
        }
        Ok(())
    }

    /// Posts `message` to the channel as a single line.
    pub async fn say(&self, message: &str) -> Result<(), ConnectorError> {
        let message = message.replace(['\r', '\n'], " ");
        info!("> {}", message);
        self.send_task(SendTask::PrivateMessage(self.channel.to_string(), message))
            .await
    }

    /// Posts `message` as an action (`/me`) line.
    pub async fn action(&self, message: &str) -> Result<(), ConnectorError> {
        if message.starts_with(ACTION_PREFIX) {
            self.say(message).await
        } else {
            self.say(&format!("{}{}", ACTION_PREFIX, message)).await
        }
    }

    pub async fn close(&self) {
        self.writer.lock().await.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::super::transport::testing::mock_transport;
    use super::*;

    #[test]
    fn prints_private_messages_correctly() {
        let task = SendTask::PrivateMessage("channelname".to_string(), "Message".to_string());
        assert_eq!(task.to_string(), "PRIVMSG #channelname :Message");
    }

    #[test]
    fn prints_login_password_messages_correctly() {
        let task = SendTask::ProvideLoginPassword("admin123".to_string());
        assert_eq!(task.to_string(), "PASS oauth:admin123");
        let task = SendTask::ProvideLoginPassword("oauth:admin123".to_string());
        assert_eq!(task.to_string(), "PASS oauth:admin123");
    }

    #[test]
    fn prints_login_username_messages_correctly() {
        let task = SendTask::ProvideLoginUserName("user123".to_string());
        assert_eq!(task.to_string(), "NICK user123");
    }

    #[test]
    fn prints_join_channel_messages_correctly() {
        let task = SendTask::JoinChannel("channel123".to_string());
        assert_eq!(task.to_string(), "JOIN #channel123");
    }

    #[test]
    fn prints_request_capabilities_messages_correctly() {
        let task = SendTask::RequestCapabilities("capability123".to_string());
        assert_eq!(task.to_string(), "CAP REQ :twitch.tv/capability123");
    }

    #[test]
    fn prints_pong_messages_correctly() {
        let task = SendTask::Pong("tmi.twitch.tv".to_string());
        assert_eq!(task.to_string(), "PONG :tmi.twitch.tv");
    }

    #[tokio::test]
    async fn say_flattens_newlines() {
        let (_, writer, sent) = mock_transport(&[]);
        let sender = ChatSender::new(Box::new(writer), "channel");
        sender.say("two\nlines").await.unwrap();
        assert_eq!(sent.lines(), vec!["PRIVMSG #channel :two lines"]);
    }

    #[tokio::test]
    async fn action_is_prefixed_once() {
        let (_, writer, sent) = mock_transport(&[]);
        let sender = ChatSender::new(Box::new(writer), "channel");
        sender.action("waves").await.unwrap();
        sender.action("/me waves").await.unwrap();
        assert_eq!(sent.chat(), vec!["/me waves", "/me waves"]);
    }

    #[tokio::test]
    async fn concurrent_sends_keep_lines_whole() {
        let (_, writer, sent) = mock_transport(&[]);
        let sender = ChatSender::new(Box::new(writer), "channel");
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let sender = sender.clone();
                tokio::spawn(async move { sender.say(&format!("message {}", i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let lines = sent.lines();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.starts_with("PRIVMSG #channel :message ")));
    }
}
