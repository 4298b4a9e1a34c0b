//! Device button bindings
//!
//! A binding is a static relationship between a physical input and an
//! action: fixed at startup, immutable for the device's run. Actions
//! are tagged variants dispatched through one match, not per-binding
//! closures.

use super::keycodes::Keycode;

/// Action bound to a physical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Send a keystroke chord to the host over USB HID
    SendKeys(&'static [Keycode]),
    /// Ask the host to invert the microphone mute state
    MicToggle,
    /// Ask the host to launch its configured application
    LaunchApp,
}

/// Static mapping from a physical input to an action.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    /// Pin label; doubles as the `BTN:` token for `LaunchApp`
    pub label: &'static str,
    pub action: ButtonAction,
}

/// The shipped keypad layout.
pub fn default_layout() -> &'static [Binding] {
    use Keycode::*;

    const LAYOUT: &[Binding] = &[
        Binding {
            label: "GP2",
            action: ButtonAction::SendKeys(&[LeftControl, LeftShift, Escape]),
        },
        Binding {
            label: "GP3",
            action: ButtonAction::MicToggle,
        },
        Binding {
            label: "GP1",
            action: ButtonAction::SendKeys(&[UpArrow]),
        },
        Binding {
            label: "GP5",
            action: ButtonAction::SendKeys(&[DownArrow]),
        },
        Binding {
            label: "GP4",
            action: ButtonAction::SendKeys(&[LeftArrow]),
        },
        Binding {
            label: "GP6",
            action: ButtonAction::SendKeys(&[RightArrow]),
        },
        Binding {
            label: "GP7",
            action: ButtonAction::SendKeys(&[LeftGui, Tab]),
        },
        Binding {
            label: "GP0",
            action: ButtonAction::LaunchApp,
        },
    ];
    LAYOUT
}
