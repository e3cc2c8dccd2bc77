mod connector;
mod error;
mod types;

pub use connector::twitch_chat::{
    ChatSender, Dialer, ExponentialRetryManager, TcpDialer, TwitchChatConnector,
};
pub use error::ConnectorError;
pub use types::{ChatMessage, Privilege};

#[cfg(test)]
pub use connector::twitch_chat::testing;
