//! USB HID usage codes for keystroke actions
//!
//! Values come from the USB HID usage table (Keyboard/Keypad page),
//! which is what the firmware's keyboard wrapper consumes directly.

/// A USB HID keyboard usage code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Keycode {
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    F13 = 0x68,
    F14 = 0x69,
    F15 = 0x6A,
    RightArrow = 0x4F,
    LeftArrow = 0x50,
    DownArrow = 0x51,
    UpArrow = 0x52,
    LeftControl = 0xE0,
    LeftShift = 0xE1,
    LeftAlt = 0xE2,
    LeftGui = 0xE3,
}

impl Keycode {
    /// Raw usage code for the HID report
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether this is a modifier key (usage codes 0xE0-0xE7)
    pub fn is_modifier(self) -> bool {
        (self as u8) >= 0xE0
    }
}
