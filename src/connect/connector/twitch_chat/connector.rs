use super::{
    receive::{LineBuffer, ReceiveEvent},
    send::{get_login_tasks, ChatSender, SendTask},
    transport::{Dialer, TransportReceiver},
};
use crate::connect::{ChatMessage, ConnectorError};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Joined,
    Closed,
}

/// One chat connection: frames received bytes into lines, answers
/// keepalive probes and hands out the shared send path.
pub struct TwitchChatConnector {
    receiver: Option<Box<dyn TransportReceiver>>,
    sender: Option<ChatSender>,
    lines: LineBuffer,
    // lines that arrived in the same read as the end of the roster
    backlog: Vec<String>,
    channel: String,
    state: ConnectionState,
}

impl TwitchChatConnector {
    pub fn new(channel: &str) -> Self {
        Self {
            receiver: None,
            sender: None,
            lines: LineBuffer::default(),
            backlog: Vec::new(),
            channel: channel.to_owned(),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connects, logs in and joins the channel. Returns once the server
    /// finished sending the channel roster.
    pub async fn join(
        &mut self,
        dialer: &dyn Dialer,
        (host, port): (&str, u16),
        password: &str,
        bot_user_name: &str,
    ) -> Result<(), ConnectorError> {
        self.state = ConnectionState::Connecting;
        let result = self.handshake(dialer, host, port, password, bot_user_name).await;
        match &result {
            Ok(()) => {
                info!("Connected to {}'s chat.", self.channel);
                self.state = ConnectionState::Joined;
            }
            Err(_) => self.close().await,
        }
        result
    }

    async fn handshake(
        &mut self,
        dialer: &dyn Dialer,
        host: &str,
        port: u16,
        password: &str,
        bot_user_name: &str,
    ) -> Result<(), ConnectorError> {
        let (receiver, writer) = dialer.connect(host, port).await?;
        let sender = ChatSender::new(writer, &self.channel);
        self.receiver = Some(receiver);
        self.sender = Some(sender.clone());
        sender
            .send_multiple(get_login_tasks(password, bot_user_name, &self.channel))
            .await?;

        loop {
            let chunk = self.receive_chunk().await.map_err(|err| match err {
                ConnectorError::ConnectionClosed => ConnectorError::JoinFailed,
                other => other,
            })?;
            let mut lines = self.lines.push(&chunk).into_iter();
            while let Some(line) = lines.next() {
                match ReceiveEvent::parse_from_message(&line, &self.channel) {
                    Some(ReceiveEvent::EndOfNames) => {
                        self.backlog = lines.by_ref().collect();
                        return Ok(());
                    }
                    Some(ReceiveEvent::Ping(server)) => {
                        sender.send_task(SendTask::Pong(server)).await?
                    }
                    _ => debug!("< {}", line),
                }
            }
        }
    }

    async fn receive_chunk(&mut self) -> Result<Vec<u8>, ConnectorError> {
        let receiver = self.receiver.as_mut().ok_or(ConnectorError::NotConnected)?;
        let chunk = receiver.receive().await?;
        if chunk.is_empty() {
            return Err(ConnectorError::ConnectionClosed);
        }
        Ok(chunk)
    }

    /// Clone of the send path; shared with background tasks.
    pub fn sender(&self) -> Result<ChatSender, ConnectorError> {
        self.sender.clone().ok_or(ConnectorError::NotConnected)
    }

    /// Waits for the next read and returns the chat messages it carried.
    /// Every keepalive probe is answered, in order, before this returns.
    pub async fn recv_messages(&mut self) -> Result<Vec<ChatMessage>, ConnectorError> {
        if self.state != ConnectionState::Joined {
            return Err(ConnectorError::NotConnected);
        }
        let lines = if self.backlog.is_empty() {
            match self.receive_chunk().await {
                Ok(chunk) => self.lines.push(&chunk),
                Err(err) => {
                    self.state = ConnectionState::Closed;
                    return Err(err);
                }
            }
        } else {
            std::mem::take(&mut self.backlog)
        };
        let sender = self.sender()?;
        let mut messages = Vec::new();
        for line in lines {
            match ReceiveEvent::parse_from_message(&line, &self.channel) {
                Some(ReceiveEvent::Ping(server)) => {
                    sender.send_task(SendTask::Pong(server)).await?
                }
                Some(ReceiveEvent::ChatMessage(message)) => messages.push(message),
                _ => (),
            }
        }
        Ok(messages)
    }

    pub async fn close(&mut self) {
        if let Some(sender) = self.sender.take() {
            sender.close().await;
        }
        self.receiver = None;
        self.state = ConnectionState::Closed;
    }
}
