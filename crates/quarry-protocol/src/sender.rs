use crate::error::ProtocolError;
use crate::frame::frame;
use crate::packet::{encode_packet, ClientboundPacket};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Cloneable handle to the write half of a connection.
///
/// Every send holds the lock for a whole frame, so frames from the session
/// task, its keep-alive task and broadcasts never interleave.
#[derive(Clone)]
pub struct PacketSender {
    writer: Arc<Mutex<BoxedWriter>>,
}

impl PacketSender {
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub async fn send<P: ClientboundPacket>(&self, packet: &P) -> Result<(), ProtocolError> {
        let body = encode_packet(packet)?;
        self.send_body(&body).await
    }

    /// Sends an already encoded `id + payload` body.
    pub async fn send_body(&self, body: &[u8]) -> Result<(), ProtocolError> {
        let framed = frame(body)?;
        self.send_framed(&framed).await
    }

    /// Writes bytes that already carry their length prefix.
    pub async fn send_framed(&self, framed: &[u8]) -> Result<(), ProtocolError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(framed).await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<(), ProtocolError> {
        let mut writer = self.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }
}

impl fmt::Debug for PacketSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketSender").finish_non_exhaustive()
    }
}
