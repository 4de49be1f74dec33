//! Outbound Open Sound Control link.
//!
//! Every launch forwards its display color to downstream consumers
//! (lighting, audio) as:
//!
//! ```text
//! /color  f:red  f:green  f:blue      each in [0, 1]
//! ```

use crane_shared::color::Rgb;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::{OscError, OscResult};

pub const COLOR_ADDRESS: &str = "/color";

/// Destination for launched colors.
pub trait ColorSink {
    fn send_color(&mut self, color: Rgb) -> OscResult<()>;
}

/// Build the `/color` message for `color`.
pub fn color_message(color: Rgb) -> OscMessage {
    OscMessage {
        addr: COLOR_ADDRESS.to_string(),
        args: color.normalized().into_iter().map(OscType::Float).collect(),
    }
}

pub fn encode_color(color: Rgb) -> OscResult<Vec<u8>> {
    encoder::encode(&OscPacket::Message(color_message(color)))
        .map_err(|e| OscError::Encoding(format!("{:?}", e)))
}

/// Sends `/color` packets over UDP without blocking the frame loop.
pub struct OscColorSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscColorSender {
    /// `target` is a `host:port` pair, e.g. `"127.0.0.1:9000"`.
    pub fn new(target: &str) -> OscResult<Self> {
        let target = target
            .to_socket_addrs()
            .map_err(|_| OscError::InvalidAddress(target.to_string()))?
            .next()
            .ok_or_else(|| OscError::InvalidAddress(target.to_string()))?;
        let bind = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl ColorSink for OscColorSender {
    fn send_color(&mut self, color: Rgb) -> OscResult<()> {
        let bytes = encode_color(color)?;
        self.socket.send_to(&bytes, self.target)?;
        Ok(())
    }
}

/// Keeps every color it is given.
impl ColorSink for Vec<Rgb> {
    fn send_color(&mut self, color: Rgb) -> OscResult<()> {
        self.push(color);
        Ok(())
    }
}
