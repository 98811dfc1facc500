use crate::context::ServerContext;
use crate::error::Result;
use crate::session::Session;
use quarry_common::ServerConfig;
use quarry_logger::log;
use quarry_logger::LogSeverity::{Debug, Error, Info, Warning};
use quarry_protocol::PacketSender;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// A bound listener plus the context its sessions share.
pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl Server {
    /// Builds the server context from `config` and binds its address.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let context = ServerContext::new(config)?;
        Self::with_context(context).await
    }

    pub async fn with_context(context: ServerContext) -> Result<Self> {
        let address = context.config.bind_address();
        let listener = TcpListener::bind(&address).await?;
        log(format!("Listening on {}", listener.local_addr()?), Info);
        Ok(Self {
            listener,
            context: Arc::new(context),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn context(&self) -> Arc<ServerContext> {
        Arc::clone(&self.context)
    }

    /// Accepts connections forever, one task per connection.
    pub async fn run(self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    log(format!("New connection from: {addr}"), Debug);
                    tokio::spawn(handle_connection(Arc::clone(&self.context), socket, addr));
                }
                Err(e) => log(format!("Failed to accept connection: {e}"), Error),
            }
        }
    }
}

async fn handle_connection(context: Arc<ServerContext>, socket: TcpStream, addr: SocketAddr) {
    if let Err(e) = socket.set_nodelay(true) {
        log(format!("{addr}: failed to set TCP_NODELAY: {e}"), Debug);
    }
    let (reader, writer) = socket.into_split();
    let session = Session::new(context, reader, PacketSender::new(writer), addr.to_string());

    match session.run().await {
        Ok(()) => log(format!("{addr}: connection closed"), Debug),
        Err(e) if e.is_disconnect() => log(format!("{addr}: connection lost: {e}"), Debug),
        Err(e) => log(format!("{addr}: session ended: {e}"), Warning),
    }
}
