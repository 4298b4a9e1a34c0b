//! Device module - firmware-side input and link logic
//!
//! The macropad firmware is a single-threaded cooperative poll loop:
//! scan the inputs, debounce, run the bound action, sleep, repeat.
//! The logic lives here behind pin/clock/keyboard/link seams so it is
//! testable on the host; the GPIO and usb-hid bindings themselves are
//! external collaborators.

pub mod bindings;
pub mod keycodes;
pub mod monitor;
pub mod sender;

pub use bindings::{default_layout, Binding, ButtonAction};
pub use keycodes::Keycode;
pub use monitor::{Clock, InputMonitor, InputPin, SystemClock};
pub use sender::{LineLink, LinkSender};

use monitor::{POLL_INTERVAL, SETTLE_DELAY};

/// Keyboard collaborator wrapping the usb-hid keyboard device.
pub trait KeyReporter {
    /// Press and release a chord
    fn send_keys(&mut self, keys: &[Keycode]);
}

/// Run the action bound to a confirmed button press.
pub fn dispatch<L: LineLink>(
    binding: &Binding,
    keyboard: &mut dyn KeyReporter,
    link: &mut LinkSender<L>,
) {
    match binding.action {
        ButtonAction::SendKeys(keys) => keyboard.send_keys(keys),
        ButtonAction::MicToggle => link.mic_toggle(),
        ButtonAction::LaunchApp => link.button(binding.label),
    }
}

/// The firmware main loop: settle after power-on, then scan at a
/// fixed cadence forever. The sleep between scans is the only
/// blocking point; actions are expected to be fast, non-blocking
/// sends.
pub fn run_input_loop<P, C, L>(
    monitor: &mut InputMonitor<P, C>,
    bindings: &[Binding],
    keyboard: &mut dyn KeyReporter,
    link: &mut LinkSender<L>,
) -> !
where
    P: InputPin,
    C: Clock,
    L: LineLink,
{
    std::thread::sleep(SETTLE_DELAY);

    loop {
        for index in monitor.poll() {
            if let Some(binding) = bindings.get(index) {
                dispatch(binding, keyboard, link);
            }
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
