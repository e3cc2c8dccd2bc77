mod connector;
mod receive;
mod retry_manager;
mod send;
mod transport;

pub use connector::TwitchChatConnector;
pub use retry_manager::ExponentialRetryManager;
pub use send::ChatSender;
pub use transport::{Dialer, TcpDialer};

#[cfg(test)]
pub use transport::testing;
