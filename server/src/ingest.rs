//! Inbound crane reports.
//!
//! [`IngestBridge`] pulls datagrams from a non-blocking [`DatagramSource`],
//! decodes them, snaps the observed color to the palette and hands back a
//! [`ColorEvent`]. Anything malformed or unmatched is dropped on the spot.

use crane_shared::color::Rgb;
use crane_shared::report::CraneReport;
use std::collections::VecDeque;
use std::io;

use crate::palette::Palette;

/// Largest datagram accepted
const MAX_DATAGRAM: usize = 10_000;

/// A non-blocking datagram receiver.
pub trait DatagramSource {
    /// Copy one pending datagram into `buf`. `Ok(None)` when nothing is waiting.
    fn recv_datagram(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>>;
}

impl DatagramSource for tokio::net::UdpSocket {
    fn recv_datagram(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        match self.try_recv_from(buf) {
            Ok((len, _from)) => Ok(Some(len)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory source, handy for tests and replay.
impl DatagramSource for VecDeque<Vec<u8>> {
    fn recv_datagram(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        match self.pop_front() {
            Some(datagram) => {
                let len = datagram.len().min(buf.len());
                buf[..len].copy_from_slice(&datagram[..len]);
                Ok(Some(len))
            }
            None => Ok(None),
        }
    }
}

/// A crane report resolved against the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEvent {
    pub sender_id: String,
    /// Palette display color
    pub display: Rgb,
    /// Palette reference color that matched
    pub reference: Rgb,
    /// Normalized launch position, clamped to [0, 1]
    pub position: f64,
}

/// Outcome of reading one datagram
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Empty,
    Dropped,
    Event(ColorEvent),
}

pub struct IngestBridge<S> {
    source: S,
    palette: Palette,
    /// Sender ids in first-seen order
    cranes: Vec<String>,
    buf: Vec<u8>,
}

impl<S: DatagramSource> IngestBridge<S> {
    pub fn new(source: S, palette: Palette) -> Self {
        Self {
            source,
            palette,
            cranes: Vec::new(),
            buf: vec![0u8; MAX_DATAGRAM],
        }
    }

    /// Read at most one datagram. `None` if nothing was waiting or the
    /// datagram was dropped.
    pub fn poll(&mut self) -> Option<ColorEvent> {
        match self.receive() {
            Received::Event(event) => Some(event),
            Received::Empty | Received::Dropped => None,
        }
    }

    /// Read every pending datagram, collecting the ones that resolved.
    pub fn drain(&mut self) -> Vec<ColorEvent> {
        let mut events = Vec::new();
        loop {
            match self.receive() {
                Received::Empty => break,
                Received::Dropped => continue,
                Received::Event(event) => events.push(event),
            }
        }
        events
    }

    /// Read and resolve one datagram.
    pub fn receive(&mut self) -> Received {
        let len = match self.source.recv_datagram(&mut self.buf) {
            Ok(Some(len)) => len,
            Ok(None) => return Received::Empty,
            Err(e) => {
                tracing::warn!("Crane socket receive failed: {}", e);
                return Received::Empty;
            }
        };

        let report = match CraneReport::from_bytes(&self.buf[..len]) {
            Ok(report) => report,
            Err(e) => {
                tracing::trace!("Dropping crane datagram: {}", e);
                return Received::Dropped;
            }
        };
        if !report.position.is_finite() {
            tracing::trace!("Dropping crane datagram with position {}", report.position);
            return Received::Dropped;
        }

        self.note_crane(&report.sender_id);

        let [r, g, b] = report.rgb;
        let observed = Rgb::from_channels(r, g, b);
        let Some(reference) = self
            .palette
            .match_color(observed)
            .and_then(|idx| self.palette.get(idx))
        else {
            tracing::trace!("No palette match for {} from {}", observed, report.sender_id);
            return Received::Dropped;
        };

        Received::Event(ColorEvent {
            sender_id: report.sender_id,
            display: reference.display,
            reference: reference.color,
            position: report.position.clamp(0.0, 1.0),
        })
    }

    fn note_crane(&mut self, sender_id: &str) {
        if !self.cranes.iter().any(|c| c == sender_id) {
            self.cranes.push(sender_id.to_string());
            tracing::info!("New crane found: {}", sender_id);
        }
    }

    /// Sender ids seen so far, in first-seen order.
    pub fn cranes(&self) -> &[String] {
        &self.cranes
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
