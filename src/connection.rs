use std::io;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::error::{PwhoisError, Result};
use crate::protocol::Query;
use crate::servers::ServerConfig;

/// Timeout for establishing the TCP connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle time before TCP keep-alive packets are sent
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// One TCP connection to a pwhois server, good for a single exchange.
///
/// The server marks the end of a response by closing the connection, so
/// there is no framing: the reader drains the stream until EOF.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    address: String,
}

impl Connection {
    /// Connect to the configured server. Resolution failures, refusals and
    /// timeouts are all reported as [`PwhoisError::Connect`].
    pub async fn open(config: &ServerConfig) -> Result<Self> {
        let address = config.address();
        debug!(%address, "Connecting to pwhois server");

        let stream = tokio::time::timeout(
            CONNECT_TIMEOUT,
            TcpStream::connect((config.host(), config.port())),
        )
        .await
        .map_err(|_| PwhoisError::Connect {
            address: address.clone(),
            source: io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", CONNECT_TIMEOUT),
            ),
        })?
        .map_err(|source| PwhoisError::Connect {
            address: address.clone(),
            source,
        })?;

        if let Err(e) = set_keepalive(&stream, KEEPALIVE_INTERVAL) {
            warn!(%address, error = %e, "Failed to enable TCP keep-alive");
        }

        debug!(%address, "Connection established");
        Ok(Self { stream, address })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Write the full query onto the connection
    pub async fn send(&mut self, query: &Query) -> Result<()> {
        self.stream
            .write_all(query.as_bytes())
            .await
            .map_err(PwhoisError::Write)?;
        self.stream.flush().await.map_err(PwhoisError::Write)?;

        debug!(address = %self.address, bytes = query.as_bytes().len(), kind = %query.kind(), "Query sent");
        Ok(())
    }

    /// Read until the server closes the stream
    pub async fn read_to_end(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        self.stream
            .read_to_end(&mut buf)
            .await
            .map_err(PwhoisError::Read)?;

        debug!(address = %self.address, bytes = buf.len(), "Response received");
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Send one query, drain the response and close the connection
    pub async fn exchange(mut self, query: &Query) -> Result<String> {
        self.send(query).await?;
        let response = self.read_to_end().await?;
        self.close().await;
        Ok(response)
    }

    /// Shut the connection down. The peer has usually closed already.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(address = %self.address, error = %e, "Shutdown after EOF failed");
        }
    }
}

fn set_keepalive(stream: &TcpStream, interval: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(interval);
    SockRef::from(stream).set_tcp_keepalive(&keepalive)
}
