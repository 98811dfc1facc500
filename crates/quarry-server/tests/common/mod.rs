use futures::StreamExt;
use quarry_common::ServerConfig;
use quarry_protocol::frame::frame;
use quarry_protocol::{
    FrameCodec, PacketBuffer, ProtocolError, RawPacket, GAME_VERSION, PROTOCOL_VERSION,
};
use quarry_server::Server;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::FramedRead;
use uuid::Uuid;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Ids sent after the spawn teleport is accepted: game event, chunk center,
/// batch start, the single chunk, batch end, starter item, player list and
/// the welcome message.
pub const JOIN_BURST: [i32; 8] = [0x22, 0x57, 0x0C, 0x27, 0x0B, 0x65, 0x3F, 0x72];

/// One-chunk server config on an ephemeral port, without the delayed block
/// update so packet order stays fixed.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.server.address = "127.0.0.1".into();
    config.server.port = 0;
    config.world.radius = 0;
    config.join.block_update = None;
    config
}

pub async fn start_server() -> SocketAddr {
    start_server_with(test_config()).await
}

pub async fn start_server_with(config: ServerConfig) -> SocketAddr {
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

pub struct TestClient {
    reader: FramedRead<OwnedReadHalf, FrameCodec>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let (reader, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            reader: FramedRead::new(reader, FrameCodec),
            writer,
        }
    }

    /// Writes bytes exactly as given, length prefix included.
    pub async fn send_wire(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
    }

    pub async fn send_raw(&mut self, id: i32, payload: &[u8]) {
        let mut body = PacketBuffer::new();
        body.write_varint(id);
        body.write_bytes(payload);
        let framed = frame(&body.into_inner()).unwrap();
        self.send_wire(&framed).await;
    }

    pub async fn send_with(&mut self, id: i32, write: impl FnOnce(&mut PacketBuffer)) {
        let mut payload = PacketBuffer::new();
        write(&mut payload);
        self.send_raw(id, &payload.into_inner()).await;
    }

    /// Next frame, `None` once the server closes the connection.
    pub async fn next(&mut self) -> Option<Result<RawPacket, ProtocolError>> {
        timeout(READ_TIMEOUT, self.reader.next())
            .await
            .expect("timed out waiting for a packet")
    }

    pub async fn expect(&mut self, id: i32) -> RawPacket {
        let packet = self.next().await.unwrap().unwrap();
        assert_eq!(packet.id, id, "expected packet 0x{id:02X}, got 0x{:02X}", packet.id);
        packet
    }

    pub async fn handshake(&mut self, next_state: i32) {
        self.send_with(0x00, |b| {
            b.write_varint(PROTOCOL_VERSION);
            b.write_string("localhost");
            b.write_u16(25565);
            b.write_varint(next_state);
        })
        .await;
    }

    pub async fn ping(&mut self, payload: i64) {
        self.send_with(0x01, |b| b.write_i64(payload)).await;
    }

    /// Sends login start and checks the login success echo.
    pub async fn login(&mut self, name: &str) -> Uuid {
        let uuid = Uuid::new_v3(&Uuid::NAMESPACE_OID, name.as_bytes());
        self.handshake(2).await;
        self.send_with(0x00, |b| {
            b.write_string(name);
            b.write_uuid(uuid);
        })
        .await;
        let success = self.expect(0x02).await;
        let mut body = success.buffer();
        assert_eq!(body.read_uuid().unwrap(), uuid);
        assert_eq!(body.read_string().unwrap(), name);
        assert_eq!(body.read_varint().unwrap(), 0);

        self.send_raw(0x03, &[]).await;
        self.expect(0x0C).await;
        self.expect(0x0E).await;
        uuid
    }

    /// Reads the registries and finish packet, acknowledges it and reads the
    /// login-play and spawn position packets.
    pub async fn finish_configuration(&mut self) {
        for _ in 0..12 {
            self.expect(0x07).await;
        }
        self.expect(0x03).await;
        self.send_raw(0x03, &[]).await;
        self.expect(0x2B).await;
        self.expect(0x41).await;
    }

    /// Accepts the spawn teleport and reads the join burst.
    pub async fn accept_spawn(&mut self) {
        self.send_raw(0x00, &[0x01]).await;
        for id in JOIN_BURST {
            self.expect(id).await;
        }
    }

    /// Runs login and configuration, accepts the spawn teleport and reads
    /// the join burst up to the welcome message.
    pub async fn join(&mut self, name: &str) -> Uuid {
        let uuid = self.login(name).await;
        self.send_with(0x00, |b| {
            b.write_string("en_us");
            b.write_i8(2);
            b.write_varint(0);
            b.write_bool(true);
            b.write_u8(0x7F);
            b.write_varint(1);
            b.write_bool(false);
            b.write_bool(true);
            b.write_varint(0);
        })
        .await;
        self.send_with(0x07, |b| {
            b.write_varint(1);
            b.write_string("minecraft");
            b.write_string("core");
            b.write_string(GAME_VERSION);
        })
        .await;
        self.finish_configuration().await;
        self.accept_spawn().await;
        uuid
    }
}
