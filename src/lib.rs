//! MicDeck Companion App
//!
//! A Rust application that bridges the MicDeck macropad and the host
//! over a serial link.
//!
//! # Features
//! - Owns the serial connection on a dedicated worker thread
//! - Keeps the host microphone mute state synchronized with the device
//! - Launches a configured application on device button events
//! - Discovers the macropad's data port among enumerated serial ports
//! - Ships the firmware-side input/debounce logic as testable modules

pub mod actions;
pub mod audio;
pub mod core;
pub mod device;
pub mod link;
pub mod protocol;

pub use crate::core::config::Config;
pub use crate::core::events::LinkEvent;
pub use crate::core::state::AppState;
pub use crate::audio::MuteState;
