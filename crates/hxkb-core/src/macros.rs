use hxkb_common::dev_warn;

use crate::config;
use crate::keyboard::{BoardHooks, send_plain};
use crate::keymap::{EntryKind, KeyEntry};
use crate::report::{Modifiers, ReportBuilder};

/// A static macro definition. Send-string macros replay ASCII text as
/// keystrokes, one character per scan tick.
#[derive(Clone, Copy)]
pub enum MacroDef {
    Unused,
    SendString(&'static str),
}

#[derive(Clone, Copy, Default)]
struct MacroSlot {
    active: bool,
    index: usize,
}

/// Macro playback. While any macro is active it owns the outgoing
/// report: the dispatcher clears the report and skips the other
/// behaviors' ticks, so the host sees exactly one clean keydown per
/// character.
pub struct MacroBehavior {
    defs: &'static [MacroDef],
    slots: [MacroSlot; config::MACRO_SLOTS],
    any_active: bool,
}

impl MacroBehavior {
    pub fn new(defs: &'static [MacroDef]) -> Self {
        Self {
            defs,
            slots: [MacroSlot::default(); config::MACRO_SLOTS],
            any_active: false,
        }
    }

    pub fn start(&mut self, index: u8) {
        let i = index as usize;
        if i >= self.defs.len().min(config::MACRO_SLOTS) {
            dev_warn!("Macro index out of bounds: {}", index);
            return;
        }
        if matches!(self.defs[i], MacroDef::Unused) {
            return;
        }

        self.slots[i].active = true;
        self.slots[i].index = 0;
        self.any_active = true;
    }

    pub fn on_key_press(&mut self, key: KeyEntry) -> bool {
        if key.kind() != Some(EntryKind::Macro) {
            return false;
        }
        self.start(key.keycode());
        true
    }

    pub fn on_key_release(&mut self, _key: KeyEntry) -> bool {
        false
    }

    pub fn any_active(&self) -> bool {
        self.any_active
    }

    /// Advances every active macro by one character.
    pub fn update<H: BoardHooks>(&mut self, builder: &mut ReportBuilder, hooks: &mut H) {
        for i in 0..self.defs.len().min(config::MACRO_SLOTS) {
            if !self.slots[i].active {
                continue;
            }
            let MacroDef::SendString(text) = self.defs[i] else {
                continue;
            };

            let bytes = text.as_bytes();
            if let Some(&byte) = bytes.get(self.slots[i].index) {
                let (shifted, kc) = ascii_keystroke(byte);
                let entry = if shifted {
                    KeyEntry::with_mods(kc, Modifiers::LSHIFT.bits())
                } else {
                    KeyEntry::key(kc)
                };
                send_plain(entry, builder, hooks);
                self.slots[i].index += 1;
            }

            if self.slots[i].index >= bytes.len() {
                self.slots[i].active = false;
            }
        }

        self.any_active = self.slots.iter().any(|s| s.active);
    }
}

/// `(needs shift, usage id)` for one ASCII character.
fn ascii_keystroke(byte: u8) -> (bool, u8) {
    let (shift, kc) = ASCII_TO_KEYSTROKE[(byte & 0x7f) as usize];
    (shift != 0, kc)
}

// ASCII -> (shift, HID Keyboard/Keypad usage). Unprintable control
// characters map to nothing except backspace, tab, return and escape.
#[rustfmt::skip]
const ASCII_TO_KEYSTROKE: [(u8, u8); 128] = [
    (0, 0x00), (0, 0x00), (0, 0x00), (0, 0x00), // 0x00..0x03
    (0, 0x00), (0, 0x00), (0, 0x00), (0, 0x00), // 0x04..0x07
    (0, 0x2a), (0, 0x2b), (0, 0x28), (0, 0x00), // BS TAB LF
    (0, 0x00), (0, 0x28), (0, 0x00), (0, 0x00), // CR
    (0, 0x00), (0, 0x00), (0, 0x00), (0, 0x00), // 0x10..0x13
    (0, 0x00), (0, 0x00), (0, 0x00), (0, 0x00), // 0x14..0x17
    (0, 0x00), (0, 0x00), (0, 0x00), (0, 0x29), // ESC
    (0, 0x00), (0, 0x00), (0, 0x00), (0, 0x00), // 0x1c..0x1f
    (0, 0x2c), (1, 0x1e), (1, 0x34), (1, 0x20), // ' ' ! " #
    (1, 0x21), (1, 0x22), (1, 0x24), (0, 0x34), // $ % & '
    (1, 0x26), (1, 0x27), (1, 0x25), (1, 0x2e), // ( ) * +
    (0, 0x36), (0, 0x2d), (0, 0x37), (0, 0x38), // , - . /
    (0, 0x27), (0, 0x1e), (0, 0x1f), (0, 0x20), // 0 1 2 3
    (0, 0x21), (0, 0x22), (0, 0x23), (0, 0x24), // 4 5 6 7
    (0, 0x25), (0, 0x26), (1, 0x33), (0, 0x33), // 8 9 : ;
    (1, 0x36), (0, 0x2e), (1, 0x37), (1, 0x38), // < = > ?
    (1, 0x1f), (1, 0x04), (1, 0x05), (1, 0x06), // @ A B C
    (1, 0x07), (1, 0x08), (1, 0x09), (1, 0x0a), // D E F G
    (1, 0x0b), (1, 0x0c), (1, 0x0d), (1, 0x0e), // H I J K
    (1, 0x0f), (1, 0x10), (1, 0x11), (1, 0x12), // L M N O
    (1, 0x13), (1, 0x14), (1, 0x15), (1, 0x16), // P Q R S
    (1, 0x17), (1, 0x18), (1, 0x19), (1, 0x1a), // T U V W
    (1, 0x1b), (1, 0x1c), (1, 0x1d), (0, 0x2f), // X Y Z [
    (0, 0x31), (0, 0x30), (1, 0x23), (1, 0x2d), // \ ] ^ _
    (0, 0x35), (0, 0x04), (0, 0x05), (0, 0x06), // ` a b c
    (0, 0x07), (0, 0x08), (0, 0x09), (0, 0x0a), // d e f g
    (0, 0x0b), (0, 0x0c), (0, 0x0d), (0, 0x0e), // h i j k
    (0, 0x0f), (0, 0x10), (0, 0x11), (0, 0x12), // l m n o
    (0, 0x13), (0, 0x14), (0, 0x15), (0, 0x16), // p q r s
    (0, 0x17), (0, 0x18), (0, 0x19), (0, 0x1a), // t u v w
    (0, 0x1b), (0, 0x1c), (0, 0x1d), (1, 0x2f), // x y z {
    (1, 0x31), (1, 0x30), (1, 0x35), (0, 0x4c), // | } ~ DEL
];

#[cfg(test)]
mod tests {
    extern crate std;

    use super::ascii_keystroke;
    use crate::keys;

    #[test]
    fn test_ascii_letters() {
        assert_eq!(ascii_keystroke(b'a'), (false, keys::KC_A));
        assert_eq!(ascii_keystroke(b'z'), (false, keys::KC_Z));
        assert_eq!(ascii_keystroke(b'A'), (true, keys::KC_A));
        assert_eq!(ascii_keystroke(b'Z'), (true, keys::KC_Z));
    }

    #[test]
    fn test_ascii_digits_and_symbols() {
        assert_eq!(ascii_keystroke(b'1'), (false, keys::KC_1));
        assert_eq!(ascii_keystroke(b'0'), (false, keys::KC_0));
        assert_eq!(ascii_keystroke(b'!'), (true, keys::KC_1));
        assert_eq!(ascii_keystroke(b'('), (true, keys::KC_9));
        assert_eq!(ascii_keystroke(b')'), (true, keys::KC_0));
        assert_eq!(ascii_keystroke(b'-'), (false, keys::KC_MINUS));
        assert_eq!(ascii_keystroke(b'>'), (true, keys::KC_DOT));
        assert_eq!(ascii_keystroke(b'_'), (true, keys::KC_MINUS));
        assert_eq!(ascii_keystroke(b' '), (false, keys::KC_SPC));
    }

    #[test]
    fn test_ascii_control_chars() {
        assert_eq!(ascii_keystroke(b'\n'), (false, keys::KC_ENTER));
        assert_eq!(ascii_keystroke(b'\t'), (false, keys::KC_TAB));
        assert_eq!(ascii_keystroke(0x08), (false, keys::KC_BSPC));
        assert_eq!(ascii_keystroke(0x00), (false, keys::KC_NONE));
    }
}
