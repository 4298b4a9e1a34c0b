//! Device link sender - serializes device events onto the link

use std::io;
use tracing::warn;

/// The device's view of the serial link (the usb-cdc data channel).
pub trait LineLink {
    /// Whether the host side of the link is attached
    fn connected(&self) -> bool;

    /// Write one newline-terminated line
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Serializes device-originated events into protocol lines.
///
/// Sends are fire-and-forget: a failed or unconnected write is logged
/// and swallowed so the input loop never stalls on the link.
pub struct LinkSender<L: LineLink> {
    link: L,
}

impl<L: LineLink> LinkSender<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// Request the host to invert the mute state
    pub fn mic_toggle(&mut self) {
        self.send("MIC:TOGGLE");
    }

    /// Request an authoritative state report
    pub fn mic_state_query(&mut self) {
        self.send("MIC:STATE?");
    }

    /// Report a button event for host-side dispatch
    pub fn button(&mut self, token: &str) {
        self.send(&format!("BTN:{}", token));
    }

    /// Access the underlying link
    pub fn link(&self) -> &L {
        &self.link
    }

    fn send(&mut self, line: &str) {
        if !self.link.connected() {
            return;
        }
        if let Err(e) = self.link.write_line(line) {
            warn!("Link send failed ({}): {}", line, e);
        }
    }
}
