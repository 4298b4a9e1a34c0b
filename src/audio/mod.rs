//! Audio module - host microphone endpoint adapter
//!
//! The OS audio subsystem owns the authoritative mute state; this
//! module wraps its get/set/toggle primitive behind a narrow trait.
//! Everything else in the system holds cached copies at most.

#[cfg(windows)]
mod wasapi;

#[cfg(windows)]
pub use wasapi::CaptureEndpoint;

use std::fmt;
use thiserror::Error;

/// Mute state of the default capture endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteState {
    Muted,
    Unmuted,
}

impl MuteState {
    pub fn from_muted(muted: bool) -> Self {
        if muted {
            MuteState::Muted
        } else {
            MuteState::Unmuted
        }
    }

    pub fn is_muted(self) -> bool {
        matches!(self, MuteState::Muted)
    }

    pub fn inverted(self) -> Self {
        match self {
            MuteState::Muted => MuteState::Unmuted,
            MuteState::Unmuted => MuteState::Muted,
        }
    }

    /// Wire token used in `MIC:STATE` report lines (case-sensitive).
    pub fn as_wire_str(self) -> &'static str {
        match self {
            MuteState::Muted => "MUTED",
            MuteState::Unmuted => "UNMUTED",
        }
    }
}

impl fmt::Display for MuteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Audio endpoint adapter errors. All of these are local, non-fatal
/// failures as far as the rest of the host is concerned.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no default capture device available")]
    NoDefaultDevice,

    #[cfg(windows)]
    #[error("COM initialization failed: {0}")]
    ComInitFailed(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("endpoint volume control not available: {0}")]
    VolumeNotAvailable(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Windows audio API error: {0}")]
    WindowsError(#[source] windows::core::Error),

    #[error("no capture endpoint backend on this platform")]
    Unsupported,
}

/// The host audio endpoint's mute primitive.
pub trait AudioEndpoint: Send {
    /// Read the current mute state from the OS.
    fn get_mute(&self) -> Result<MuteState, AudioError>;

    /// Set the mute state on the OS.
    fn set_mute(&self, state: MuteState) -> Result<(), AudioError>;

    /// Invert the mute state, reading the current value from the OS
    /// (never from a cache). Returns the new state.
    fn toggle(&self) -> Result<MuteState, AudioError> {
        let next = self.get_mute()?.inverted();
        self.set_mute(next)?;
        Ok(next)
    }
}

impl AudioEndpoint for Box<dyn AudioEndpoint> {
    fn get_mute(&self) -> Result<MuteState, AudioError> {
        (**self).get_mute()
    }

    fn set_mute(&self, state: MuteState) -> Result<(), AudioError> {
        (**self).set_mute(state)
    }

    fn toggle(&self) -> Result<MuteState, AudioError> {
        (**self).toggle()
    }
}

/// Endpoint for platforms without a capture-mute backend. Every call
/// fails locally; the protocol handler reports it and carries on.
#[cfg(not(windows))]
pub struct UnsupportedEndpoint;

#[cfg(not(windows))]
impl AudioEndpoint for UnsupportedEndpoint {
    fn get_mute(&self) -> Result<MuteState, AudioError> {
        Err(AudioError::Unsupported)
    }

    fn set_mute(&self, _state: MuteState) -> Result<(), AudioError> {
        Err(AudioError::Unsupported)
    }
}

/// Construct the platform's endpoint adapter.
pub fn default_endpoint() -> Box<dyn AudioEndpoint> {
    #[cfg(windows)]
    {
        Box::new(CaptureEndpoint::new())
    }
    #[cfg(not(windows))]
    {
        Box::new(UnsupportedEndpoint)
    }
}
