//! Application state management

use crate::audio::MuteState;

/// Host-side view of the bridge, updated by the protocol handler.
///
/// This is the narrow surface a front-end (tray icon, window, CLI
/// status line) reads. The mute value is a cached copy of the last
/// state reported by the OS endpoint; the endpoint itself stays
/// authoritative.
#[derive(Debug, Default)]
pub struct AppState {
    /// Whether the serial link worker currently holds an open connection
    pub link_connected: bool,
    /// Last mute state reported to the device, if any
    pub mic_state: Option<MuteState>,
    /// Last operator-visible status message
    pub status: Option<String>,
}

impl AppState {
    /// Create a new AppState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operator-visible status message
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}
