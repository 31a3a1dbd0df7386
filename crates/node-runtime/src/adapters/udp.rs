//! # UDP Transport
//!
//! One JSON-encoded packet per datagram, at most
//! [`MAX_PACKET_SIZE`](shared_types::codec::MAX_PACKET_SIZE) bytes. Every
//! packet sent or received is recorded for inspection.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pc_03_gossip::{Transport, TransportError};
use shared_types::codec::{decode_packet, encode_packet, MAX_PACKET_SIZE};
use shared_types::{Address, Packet};
use tokio::net::UdpSocket;

use super::with_timeout;

pub struct UdpTransport {
    socket: UdpSocket,
    local: Address,
    ins: Mutex<Vec<Packet>>,
    outs: Mutex<Vec<Packet>>,
}

fn io_error(err: std::io::Error) -> TransportError {
    TransportError::Io(err.to_string())
}

impl UdpTransport {
    /// Bind to `address` (`host:port`; port 0 picks a free one).
    pub async fn bind(address: &str) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(address).await.map_err(io_error)?;
        let local = socket.local_addr().map_err(io_error)?.to_string();
        Ok(Self {
            socket,
            local,
            ins: Mutex::new(Vec::new()),
            outs: Mutex::new(Vec::new()),
        })
    }

    /// Packets received so far.
    pub fn ins(&self) -> Vec<Packet> {
        self.ins.lock().clone()
    }

    /// Packets sent so far.
    pub fn outs(&self) -> Vec<Packet> {
        self.outs.lock().clone()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(
        &self,
        dest: &str,
        packet: Packet,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        let bytes = encode_packet(&packet)?;
        if bytes.len() > MAX_PACKET_SIZE {
            return Err(TransportError::PacketTooLarge {
                size: bytes.len(),
                max: MAX_PACKET_SIZE,
            });
        }

        with_timeout(timeout, async {
            self.socket
                .send_to(&bytes, dest)
                .await
                .map(|_| ())
                .map_err(io_error)
        })
        .await?;

        self.outs.lock().push(packet);
        Ok(())
    }

    async fn recv(&self, timeout: Duration) -> Result<Packet, TransportError> {
        let mut buf = vec![0u8; MAX_PACKET_SIZE];
        let len = with_timeout(timeout, async {
            self.socket
                .recv_from(&mut buf)
                .await
                .map(|(len, _)| len)
                .map_err(io_error)
        })
        .await?;

        let packet = decode_packet(&buf[..len])?;
        self.ins.lock().push(packet.clone());
        Ok(packet)
    }

    fn local_address(&self) -> Address {
        self.local.clone()
    }
}
