use async_trait::async_trait;
use log::debug;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
};

use crate::connect::ConnectorError;

const RECEIVE_BUFFER_SIZE: usize = 4096;

/// Receiving half of a chat connection.
#[async_trait]
pub trait TransportReceiver: Send {
    /// An empty chunk means the peer closed the connection.
    async fn receive(&mut self) -> Result<Vec<u8>, ConnectorError>;
}

/// Sending half of a chat connection.
#[async_trait]
pub trait TransportSender: Send {
    async fn send(&mut self, bytes: &[u8]) -> Result<(), ConnectorError>;
    async fn close(&mut self);
}

pub type TransportHalves = (Box<dyn TransportReceiver>, Box<dyn TransportSender>);

/// Opens transports. Retrying a failed connect is the caller's business.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn connect(&self, host: &str, port: u16) -> Result<TransportHalves, ConnectorError>;
}

pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    async fn connect(&self, host: &str, port: u16) -> Result<TransportHalves, ConnectorError> {
        let address = format!("{}:{}", host, port);
        let stream = TcpStream::connect(&address)
            .await
            .map_err(|err| ConnectorError::ConnectFailed(address.clone(), err))?;
        debug!("TCP connection to {} established", address);
        let (reader, writer) = stream.into_split();
        Ok((Box::new(TcpReceiver(reader)), Box::new(TcpSender(writer))))
    }
}

struct TcpReceiver(OwnedReadHalf);

#[async_trait]
impl TransportReceiver for TcpReceiver {
    async fn receive(&mut self) -> Result<Vec<u8>, ConnectorError> {
        let mut buffer = vec![0; RECEIVE_BUFFER_SIZE];
        let read = self.0.read(&mut buffer).await.map_err(|err| {
            ConnectorError::MessageReceiveFailed(format!("Could not receive message: {:?}", err))
        })?;
        buffer.truncate(read);
        Ok(buffer)
    }
}

struct TcpSender(OwnedWriteHalf);

#[async_trait]
impl TransportSender for TcpSender {
    async fn send(&mut self, bytes: &[u8]) -> Result<(), ConnectorError> {
        self.0.write_all(bytes).await.map_err(|err| {
            ConnectorError::MessageSendFailed(format!("Could not send message: {:?}", err))
        })
    }

    async fn close(&mut self) {
        if let Err(err) = self.0.shutdown().await {
            debug!("Error while shutting down the connection: {:?}", err);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::super::send::ChatSender;
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn tcp_transport_carries_lines_and_reports_close() {
        const LINE: &[u8] = b"PRIVMSG #channel :hi there\r\n";
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut line = vec![0; LINE.len()];
            socket.read_exact(&mut line).await.unwrap();
            socket.write_all(b"PING :tmi.twitch.tv\r\n").await.unwrap();
            line
        });

        let (mut receiver, writer) = TcpDialer.connect("127.0.0.1", port).await.unwrap();
        let sender = ChatSender::new(writer, "channel");
        sender.say("hi there").await.unwrap();
        assert_eq!(server.await.unwrap(), LINE);

        // the server socket is gone by now; reads drain, then report the close
        let mut received = Vec::new();
        loop {
            let chunk = receiver.receive().await.unwrap();
            if chunk.is_empty() {
                break;
            }
            received.extend(chunk);
        }
        assert_eq!(received, b"PING :tmi.twitch.tv\r\n");
        sender.close().await;
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let result = TcpDialer.connect("127.0.0.1", port).await;
        assert!(matches!(result, Err(ConnectorError::ConnectFailed(..))));
    }
}
