//! Serial wire protocol
//!
//! Line-oriented UTF-8 text, `\n`-terminated, case-sensitive tokens:
//!
//! | Direction   | Line                | Meaning                        |
//! |-------------|---------------------|--------------------------------|
//! | device→host | `MIC:TOGGLE`        | invert the host mute state     |
//! | device→host | `MIC:STATE?`        | report the current mute state  |
//! | device→host | `BTN:<token>`       | run the configured action      |
//! | host→device | `MIC:STATE MUTED`   | authoritative report: muted    |
//! | host→device | `MIC:STATE UNMUTED` | authoritative report: unmuted  |

pub mod handler;

use crate::audio::MuteState;

/// Maximum accepted protocol line length in bytes.
pub const MAX_LINE_LEN: usize = 128;

/// A command received from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// `MIC:TOGGLE` - request the host to invert the mute state
    MicToggle,
    /// `MIC:STATE?` - request an authoritative state report
    MicStateQuery,
    /// `BTN:<token>` - request the action bound to a button
    Button(String),
}

impl DeviceCommand {
    /// Parse a trimmed protocol line. Unrecognized lines yield `None`
    /// and are ignored for forward compatibility.
    pub fn parse(line: &str) -> Option<Self> {
        match line {
            "MIC:TOGGLE" => Some(DeviceCommand::MicToggle),
            "MIC:STATE?" => Some(DeviceCommand::MicStateQuery),
            _ => match line.strip_prefix("BTN:") {
                Some(token) if !token.is_empty() => {
                    Some(DeviceCommand::Button(token.to_string()))
                }
                _ => None,
            },
        }
    }
}

/// Render the authoritative state report line for `state`.
pub fn state_report(state: MuteState) -> String {
    format!("MIC:STATE {}", state.as_wire_str())
}
