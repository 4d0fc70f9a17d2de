#![no_std]

mod devlog;
pub mod util;

pub use log as __log;

/// The physical state of a single key position, as reported by the
/// matrix scan.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyState {
    Released = 0,
    Pressed = 1,
}

impl KeyState {
    pub const fn from_bool(value: bool) -> KeyState {
        match value {
            true => KeyState::Pressed,
            false => KeyState::Released,
        }
    }

    pub const fn to_bool(self) -> bool {
        match self {
            KeyState::Released => false,
            KeyState::Pressed => true,
        }
    }

    pub const fn is_pressed(self) -> bool {
        self.to_bool()
    }
}

impl Default for KeyState {
    fn default() -> Self {
        KeyState::Released
    }
}
