//! Application event definitions

/// Events emitted by the link worker and consumed by the host loop.
///
/// Lines are delivered in wire order: the worker is the only reader of
/// the connection and the channel preserves FIFO ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Serial port opened successfully
    Connected {
        /// Port identifier, e.g. "COM6" or "/dev/ttyACM1"
        port: String,
    },

    /// Connection closed (cooperative stop or fatal I/O error)
    Disconnected,

    /// Complete protocol line received (newline-terminated, trimmed, non-empty)
    Line(String),
}
