//! Plain `u8` keycode constants for building keymap entries, expressed
//! in terms of the HID Keyboard/Keypad usage page.

use usbd_hid::descriptor::KeyboardUsage;

/// No key. A keymap cell holding only this value emits nothing.
pub const KC_NONE: u8 = 0x00;
/// Transparent sentinel: defer to the base layer at this position.
/// Reuses the ErrorRollOver usage, which never appears in a keymap.
pub const KC_TRANS: u8 = KeyboardUsage::KeyboardErrorRollOver as u8;

pub const KC_A: u8 = KeyboardUsage::KeyboardAa as u8;
pub const KC_B: u8 = KeyboardUsage::KeyboardBb as u8;
pub const KC_C: u8 = KeyboardUsage::KeyboardCc as u8;
pub const KC_D: u8 = KeyboardUsage::KeyboardDd as u8;
pub const KC_E: u8 = KeyboardUsage::KeyboardEe as u8;
pub const KC_F: u8 = KeyboardUsage::KeyboardFf as u8;
pub const KC_G: u8 = KeyboardUsage::KeyboardGg as u8;
pub const KC_H: u8 = KeyboardUsage::KeyboardHh as u8;
pub const KC_I: u8 = KeyboardUsage::KeyboardIi as u8;
pub const KC_J: u8 = KeyboardUsage::KeyboardJj as u8;
pub const KC_K: u8 = KeyboardUsage::KeyboardKk as u8;
pub const KC_L: u8 = KeyboardUsage::KeyboardLl as u8;
pub const KC_M: u8 = KeyboardUsage::KeyboardMm as u8;
pub const KC_N: u8 = KeyboardUsage::KeyboardNn as u8;
pub const KC_O: u8 = KeyboardUsage::KeyboardOo as u8;
pub const KC_P: u8 = KeyboardUsage::KeyboardPp as u8;
pub const KC_Q: u8 = KeyboardUsage::KeyboardQq as u8;
pub const KC_R: u8 = KeyboardUsage::KeyboardRr as u8;
pub const KC_S: u8 = KeyboardUsage::KeyboardSs as u8;
pub const KC_T: u8 = KeyboardUsage::KeyboardTt as u8;
pub const KC_U: u8 = KeyboardUsage::KeyboardUu as u8;
pub const KC_V: u8 = KeyboardUsage::KeyboardVv as u8;
pub const KC_W: u8 = KeyboardUsage::KeyboardWw as u8;
pub const KC_X: u8 = KeyboardUsage::KeyboardXx as u8;
pub const KC_Y: u8 = KeyboardUsage::KeyboardYy as u8;
pub const KC_Z: u8 = KeyboardUsage::KeyboardZz as u8;

pub const KC_1: u8 = KeyboardUsage::Keyboard1Exclamation as u8;
pub const KC_2: u8 = KeyboardUsage::Keyboard2At as u8;
pub const KC_3: u8 = KeyboardUsage::Keyboard3Hash as u8;
pub const KC_4: u8 = KeyboardUsage::Keyboard4Dollar as u8;
pub const KC_5: u8 = KeyboardUsage::Keyboard5Percent as u8;
pub const KC_6: u8 = KeyboardUsage::Keyboard6Caret as u8;
pub const KC_7: u8 = KeyboardUsage::Keyboard7Ampersand as u8;
pub const KC_8: u8 = KeyboardUsage::Keyboard8Asterisk as u8;
pub const KC_9: u8 = KeyboardUsage::Keyboard9OpenParens as u8;
pub const KC_0: u8 = KeyboardUsage::Keyboard0CloseParens as u8;

pub const KC_ENTER: u8 = KeyboardUsage::KeyboardEnter as u8;
pub const KC_ESC: u8 = KeyboardUsage::KeyboardEscape as u8;
pub const KC_BSPC: u8 = KeyboardUsage::KeyboardBackspace as u8;
pub const KC_TAB: u8 = KeyboardUsage::KeyboardTab as u8;
pub const KC_SPC: u8 = KeyboardUsage::KeyboardSpacebar as u8;
pub const KC_MINUS: u8 = KeyboardUsage::KeyboardDashUnderscore as u8;
pub const KC_EQ: u8 = KeyboardUsage::KeyboardEqualPlus as u8;
pub const KC_BRKT_L: u8 = KeyboardUsage::KeyboardOpenBracketBrace as u8;
pub const KC_BRKT_R: u8 = KeyboardUsage::KeyboardCloseBracketBrace as u8;
pub const KC_BSLS: u8 = KeyboardUsage::KeyboardBackslashBar as u8;
pub const KC_SCLN: u8 = KeyboardUsage::KeyboardSemiColon as u8;
pub const KC_QUOTE: u8 = KeyboardUsage::KeyboardSingleDoubleQuote as u8;
pub const KC_GRAVE: u8 = KeyboardUsage::KeyboardBacktickTilde as u8;
pub const KC_COMMA: u8 = KeyboardUsage::KeyboardCommaLess as u8;
pub const KC_DOT: u8 = KeyboardUsage::KeyboardPeriodGreater as u8;
pub const KC_SLASH: u8 = KeyboardUsage::KeyboardSlashQuestion as u8;
pub const KC_CAPS: u8 = KeyboardUsage::KeyboardCapsLock as u8;

pub const KC_F1: u8 = KeyboardUsage::KeyboardF1 as u8;
pub const KC_F2: u8 = KeyboardUsage::KeyboardF2 as u8;
pub const KC_F3: u8 = KeyboardUsage::KeyboardF3 as u8;
pub const KC_F4: u8 = KeyboardUsage::KeyboardF4 as u8;
pub const KC_F5: u8 = KeyboardUsage::KeyboardF5 as u8;
pub const KC_F6: u8 = KeyboardUsage::KeyboardF6 as u8;
pub const KC_F7: u8 = KeyboardUsage::KeyboardF7 as u8;
pub const KC_F8: u8 = KeyboardUsage::KeyboardF8 as u8;
pub const KC_F9: u8 = KeyboardUsage::KeyboardF9 as u8;
pub const KC_F10: u8 = KeyboardUsage::KeyboardF10 as u8;
pub const KC_F11: u8 = KeyboardUsage::KeyboardF11 as u8;
pub const KC_F12: u8 = KeyboardUsage::KeyboardF12 as u8;

pub const KC_PTSC: u8 = KeyboardUsage::KeyboardPrintScreen as u8;
pub const KC_HOME: u8 = KeyboardUsage::KeyboardHome as u8;
pub const KC_PU: u8 = KeyboardUsage::KeyboardPageUp as u8;
pub const KC_DEL: u8 = KeyboardUsage::KeyboardDelete as u8;
pub const KC_END: u8 = KeyboardUsage::KeyboardEnd as u8;
pub const KC_PD: u8 = KeyboardUsage::KeyboardPageDown as u8;

pub const KC_RIGHT: u8 = KeyboardUsage::KeyboardRightArrow as u8;
pub const KC_LEFT: u8 = KeyboardUsage::KeyboardLeftArrow as u8;
pub const KC_DOWN: u8 = KeyboardUsage::KeyboardDownArrow as u8;
pub const KC_UP: u8 = KeyboardUsage::KeyboardUpArrow as u8;

// The modifier usages. Their bit position in the report modifier byte
// is encoded in the bottom nibble of the usage ID.
pub const KC_LCTL: u8 = KeyboardUsage::KeyboardLeftControl as u8;
pub const KC_LSFT: u8 = KeyboardUsage::KeyboardLeftShift as u8;
pub const KC_LALT: u8 = KeyboardUsage::KeyboardLeftAlt as u8;
pub const KC_LGUI: u8 = KeyboardUsage::KeyboardLeftGUI as u8;
pub const KC_RCTL: u8 = KeyboardUsage::KeyboardRightControl as u8;
pub const KC_RSFT: u8 = KeyboardUsage::KeyboardRightShift as u8;
pub const KC_RALT: u8 = KeyboardUsage::KeyboardRightAlt as u8;
pub const KC_RGUI: u8 = KeyboardUsage::KeyboardRightGUI as u8;
