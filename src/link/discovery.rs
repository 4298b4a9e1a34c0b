//! Serial port discovery
//!
//! The macropad exposes two CDC interfaces at once (console + data);
//! the data interface is the one carrying the protocol, so metadata
//! matching has to distinguish them.

use super::LinkError;
use tracing::debug;

/// Descriptor-string fragments identifying the board family, used as
/// the last-resort match when nothing advertises a data interface.
const BOARD_FINGERPRINTS: &[&str] = &["circuitpython", "adafruit", "rp2", "pico", "raspberry"];

/// Snapshot of one enumerated serial port.
#[derive(Debug, Clone, Default)]
pub struct PortCandidate {
    /// Port identifier, e.g. "COM6" or "/dev/ttyACM1"
    pub name: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

impl PortCandidate {
    /// All descriptive metadata as one lowercase haystack.
    fn descriptive_text(&self) -> String {
        let mut text = String::new();
        for part in [&self.product, &self.manufacturer, &self.serial_number]
            .into_iter()
            .flatten()
        {
            text.push_str(part);
            text.push(' ');
        }
        text.to_lowercase()
    }
}

/// Take a fresh snapshot of the available ports.
///
/// Re-queried on every discovery attempt; USB descriptor strings are
/// carried over where the platform provides them.
pub fn enumerate_ports() -> Result<Vec<PortCandidate>, LinkError> {
    let ports = serialport::available_ports()?;

    Ok(ports
        .into_iter()
        .map(|info| {
            let mut candidate = PortCandidate {
                name: info.port_name,
                ..Default::default()
            };
            if let serialport::SerialPortType::UsbPort(usb) = info.port_type {
                candidate.manufacturer = usb.manufacturer;
                candidate.product = usb.product;
                candidate.serial_number = usb.serial_number;
            }
            candidate
        })
        .collect())
}

/// Pick the port carrying the macropad protocol.
///
/// Precedence:
/// 1. An explicitly preferred identifier, used unconditionally.
/// 2. A port whose metadata mentions "data" (the CDC data interface).
/// 3. A port matching a known board fingerprint.
/// 4. None.
pub fn pick_port(preferred: Option<&str>, candidates: &[PortCandidate]) -> Option<String> {
    if let Some(port) = preferred {
        if !port.is_empty() {
            return Some(port.to_string());
        }
    }

    if let Some(candidate) = candidates
        .iter()
        .find(|c| c.descriptive_text().contains("data"))
    {
        return Some(candidate.name.clone());
    }

    if let Some(candidate) = candidates.iter().find(|c| {
        let text = c.descriptive_text();
        BOARD_FINGERPRINTS.iter().any(|f| text.contains(f))
    }) {
        return Some(candidate.name.clone());
    }

    None
}

/// Discover the macropad's port. Failure is terminal for startup: the
/// host must not proceed without a valid port.
pub fn discover(preferred: Option<&str>) -> Result<String, LinkError> {
    let candidates = enumerate_ports()?;
    debug!("Enumerated {} serial ports", candidates.len());
    pick_port(preferred, &candidates).ok_or(LinkError::NoPortFound)
}
