use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Could not connect to {0}: {1}")]
    ConnectFailed(String, #[source] std::io::Error),
    #[error("Connection closed by peer")]
    ConnectionClosed,
    #[error("Connection closed before the channel join completed")]
    JoinFailed,
    #[error("Receiving message failed: {0:?}")]
    MessageReceiveFailed(String),
    #[error("Sending message failed: {0:?}")]
    MessageSendFailed(String),
    #[error("Connection is not open")]
    NotConnected,
}
