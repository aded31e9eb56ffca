// src/connection/transport.rs

//! A single TCP endpoint speaking the wire protocol.
//!
//! The socket is owned exclusively by this transport and wrapped in a
//! `Framed` stream over the reply codec. Every suspension point is bounded
//! by the configured timeouts. Communication failures and malformed
//! responses drop the socket before the error surfaces: after either, the
//! stream can no longer be assumed aligned with the protocol, and the only
//! safe continuation is an explicit reconnect.

use crate::config::{ClientConfig, NodeConfig};
use crate::connection::Connection;
use crate::core::CitrineError;
use crate::core::commands::Command;
use crate::core::protocol::{RespReply, RespReplyCodec, Value};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

/// One server endpoint. Socket present ⇔ connected; disconnect is
/// idempotent; reconnect is explicit.
#[derive(Debug)]
pub struct Transport {
    host: String,
    port: u16,
    connect_timeout: Duration,
    io_timeout: Duration,
    framed: Option<Framed<TcpStream, RespReplyCodec>>,
}

impl Transport {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        connect_timeout: Duration,
        io_timeout: Duration,
    ) -> Self {
        Transport {
            host: host.into(),
            port,
            connect_timeout,
            io_timeout,
            framed: None,
        }
    }

    /// A transport for the single endpoint named by `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Transport::new(
            config.host.clone(),
            config.port,
            config.connect_timeout(),
            config.io_timeout(),
        )
    }

    /// A transport for one member of a sharded node set.
    pub fn for_node(node: &NodeConfig, config: &ClientConfig) -> Self {
        Transport::new(
            node.host.clone(),
            node.port,
            config.connect_timeout(),
            config.io_timeout(),
        )
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Drops the socket and returns the error. Used on every failure path
    /// where stream alignment is lost.
    fn fail(&mut self, error: CitrineError) -> CitrineError {
        warn!(addr = %self.addr(), %error, "connection failed; dropping socket");
        self.framed = None;
        error
    }

    async fn send_bytes(&mut self, payload: Bytes) -> Result<(), CitrineError> {
        let io_timeout = self.io_timeout;
        let framed = self.framed.as_mut().ok_or(CitrineError::NotConnected)?;
        match timeout(io_timeout, framed.send(payload)).await {
            Err(_) => Err(self.fail(CitrineError::Timeout)),
            Ok(Err(e)) => Err(self.fail(e)),
            Ok(Ok(())) => Ok(()),
        }
    }

    /// Reads one wire reply, without shaping.
    async fn next_reply(&mut self) -> Result<RespReply, CitrineError> {
        let io_timeout = self.io_timeout;
        let framed = self.framed.as_mut().ok_or(CitrineError::NotConnected)?;
        match timeout(io_timeout, framed.next()).await {
            Err(_) => Err(self.fail(CitrineError::Timeout)),
            // The server hung up mid-conversation.
            Ok(None) => Err(self.fail(CitrineError::ConnectionReset)),
            Ok(Some(Err(e))) => Err(self.fail(e)),
            Ok(Some(Ok(reply))) => {
                trace!(addr = %self.addr(), ?reply, "received reply");
                Ok(reply)
            }
        }
    }
}

#[async_trait]
impl Connection for Transport {
    async fn connect(&mut self) -> Result<(), CitrineError> {
        if self.framed.is_some() {
            return Err(CitrineError::AlreadyConnected);
        }
        let addr = self.addr();
        debug!(%addr, "connecting");
        let stream = timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| CitrineError::Timeout)??;
        // Command traffic is small and latency-bound.
        stream.set_nodelay(true)?;
        self.framed = Some(Framed::new(stream, RespReplyCodec));
        Ok(())
    }

    async fn disconnect(&mut self) {
        if self.framed.take().is_some() {
            debug!(addr = %self.addr(), "disconnected");
        }
    }

    fn is_connected(&self) -> bool {
        self.framed.is_some()
    }

    async fn write_command(&mut self, cmd: &Command) -> Result<(), CitrineError> {
        let payload = cmd.serialize()?;
        trace!(addr = %self.addr(), verb = cmd.verb(), len = payload.len(), "sending command");
        self.send_bytes(payload).await?;
        if cmd.closes_connection() {
            debug!(addr = %self.addr(), verb = cmd.verb(), "command closes connection");
            self.framed = None;
        }
        Ok(())
    }

    async fn read_reply(&mut self, cmd: &Command) -> Result<Value, CitrineError> {
        match self.next_reply().await? {
            RespReply::Error(message) => Err(CitrineError::Server(message)),
            reply => cmd.shape(reply),
        }
    }

    async fn raw_command(
        &mut self,
        payload: Bytes,
        expect_reply: bool,
    ) -> Result<Option<RespReply>, CitrineError> {
        self.send_bytes(payload).await?;
        if expect_reply {
            Ok(Some(self.next_reply().await?))
        } else {
            Ok(None)
        }
    }
}
