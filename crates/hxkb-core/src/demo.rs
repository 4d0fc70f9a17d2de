//! The reference board definition: a 4x12 split ortho layout with
//! five layers, chord combos for brackets, and a send-string macro.
//! Doubles as the fixture for the crate's integration-style tests.

use crate::combo::ComboDef;
use crate::keymap::{KeyEntry, Keymap};
use crate::keys::*;
use crate::macros::MacroDef;
use crate::report::Modifiers;

pub const LAYER_QWERTY: u8 = 0;
pub const LAYER_LOWER: u8 = 1;
pub const LAYER_RAISE: u8 = 2;
pub const LAYER_FN: u8 = 3;
pub const LAYER_SPLIT: u8 = 4;
pub const LAYER_COUNT: usize = 5;

// Firmware command set handled by the board hook.
pub const KBC_BRIGHTNESS_UP: u16 = 0x0000;
pub const KBC_BRIGHTNESS_DOWN: u16 = 0x0001;
pub const KBC_LED0_TOGGLE: u16 = 0x0002;
pub const KBC_LED1_TOGGLE: u16 = 0x0003;
pub const KBC_LED2_TOGGLE: u16 = 0x0004;
pub const KBC_LED3_TOGGLE: u16 = 0x0005;
pub const KBC_RESET_TO_BOOTLOADER: u16 = 0x0006;
pub const KBC_TOGGLE_SNAKE_MODE: u16 = 0x0007;

const fn k(kc: u8) -> KeyEntry {
    KeyEntry::key(kc)
}

const fn lc(e: KeyEntry) -> KeyEntry {
    e.lctrl()
}

const fn ls(e: KeyEntry) -> KeyEntry {
    e.lshift()
}

const fn la(e: KeyEntry) -> KeyEntry {
    e.lalt()
}

const fn lc_t(e: KeyEntry) -> KeyEntry {
    KeyEntry::mod_tap(e, Modifiers::LCTRL.bits())
}

const fn ls_t(e: KeyEntry) -> KeyEntry {
    KeyEntry::mod_tap(e, Modifiers::LSHIFT.bits())
}

const fn la_t(e: KeyEntry) -> KeyEntry {
    KeyEntry::mod_tap(e, Modifiers::LALT.bits())
}

const fn lg_t(e: KeyEntry) -> KeyEntry {
    KeyEntry::mod_tap(e, Modifiers::LGUI.bits())
}

const TRNS: KeyEntry = KeyEntry::TRANS;
const XXXX: KeyEntry = KeyEntry::NONE;

const LOWER: KeyEntry = KeyEntry::mo(LAYER_LOWER);
const RAISE: KeyEntry = KeyEntry::mo(LAYER_RAISE);
const FN: KeyEntry = KeyEntry::mo(LAYER_FN);
const SPLIT: KeyEntry = KeyEntry::mo(LAYER_SPLIT);

/// Escape on tap, backtick after the hold delay.
const GRV_ESC: KeyEntry = KeyEntry::tap_hold(k(KC_ESC), KC_GRAVE, 0);
/// Space on a single tap, enter on a double tap.
const SPC_ENT: KeyEntry = KeyEntry::double_tap(k(KC_SPC), KC_ENTER, 0);
/// Types "->".
const M_DEREF: KeyEntry = KeyEntry::macro_index(0);

const BL_RST: KeyEntry = KeyEntry::kb_control(KBC_RESET_TO_BOOTLOADER);
const SNAKE: KeyEntry = KeyEntry::kb_control(KBC_TOGGLE_SNAKE_MODE);
const TOG_L0: KeyEntry = KeyEntry::kb_control(KBC_LED0_TOGGLE);
const TOG_L1: KeyEntry = KeyEntry::kb_control(KBC_LED1_TOGGLE);
const TOG_L2: KeyEntry = KeyEntry::kb_control(KBC_LED2_TOGGLE);
const TOG_L3: KeyEntry = KeyEntry::kb_control(KBC_LED3_TOGGLE);
const L_B_UP: KeyEntry = KeyEntry::kb_control(KBC_BRIGHTNESS_UP);
const L_B_DN: KeyEntry = KeyEntry::kb_control(KBC_BRIGHTNESS_DOWN);

const C_LEFT: KeyEntry = lc(k(KC_LEFT));
const C_DOWN: KeyEntry = lc(k(KC_DOWN));
const C_UP: KeyEntry = lc(k(KC_UP));
const C_RIGHT: KeyEntry = lc(k(KC_RIGHT));

const RUN_BUILD: KeyEntry = lc(ls(k(KC_B)));
const RUN_TESTS: KeyEntry = lc(la(k(KC_T)));

// Shifted number row with home-row style mod-taps on the strong
// fingers.
const S_1: KeyEntry = lg_t(ls(k(KC_1)));
const S_2: KeyEntry = la_t(ls(k(KC_2)));
const S_3: KeyEntry = ls_t(ls(k(KC_3)));
const S_4: KeyEntry = lc_t(ls(k(KC_4)));
const S_5: KeyEntry = ls(k(KC_5));
const S_6: KeyEntry = ls(k(KC_6));
const S_7: KeyEntry = lc_t(ls(k(KC_7)));
const S_8: KeyEntry = ls_t(ls(k(KC_8)));
const S_9: KeyEntry = la_t(ls(k(KC_9)));
const S_0: KeyEntry = lg_t(ls(k(KC_0)));
const S_MINUS: KeyEntry = ls(k(KC_MINUS));

#[rustfmt::skip]
pub static KEYMAP: Keymap<LAYER_COUNT, 4, 12> = Keymap::new([
    // QWERTY
    [
        [GRV_ESC,  k(KC_Q),       k(KC_W),       k(KC_E),       k(KC_R),       k(KC_T),    k(KC_Y),  k(KC_U),       k(KC_I),       k(KC_O),       k(KC_P),          k(KC_BSPC)],
        [k(KC_TAB), lg_t(k(KC_A)), la_t(k(KC_S)), ls_t(k(KC_D)), lc_t(k(KC_F)), k(KC_G),   k(KC_H),  lc_t(k(KC_J)), ls_t(k(KC_K)), la_t(k(KC_L)), lg_t(k(KC_SCLN)), k(KC_QUOTE)],
        [k(KC_LSFT), k(KC_Z),      k(KC_X),       k(KC_C),       k(KC_V),       k(KC_B),    k(KC_N),  k(KC_M),       k(KC_COMMA),   k(KC_DOT),     k(KC_SLASH),      k(KC_ENTER)],
        [XXXX,     XXXX,          XXXX,          SPLIT,         LOWER,         SPC_ENT,    k(KC_SPC), RAISE,        SPLIT,         XXXX,          XXXX,             XXXX],
    ],
    // LOWER
    [
        [k(KC_F1), k(KC_F2),      k(KC_F3),      k(KC_F4),      k(KC_F5),      k(KC_F6),   k(KC_F7), k(KC_F8),      k(KC_F9),      k(KC_F10),     k(KC_F11),        TRNS],
        [k(KC_PTSC), lg_t(k(KC_1)), la_t(k(KC_2)), ls_t(k(KC_3)), lc_t(k(KC_4)), k(KC_5),  k(KC_6),  lc_t(k(KC_7)), ls_t(k(KC_8)), la_t(k(KC_9)), lg_t(k(KC_0)),    k(KC_MINUS)],
        [TRNS,     C_LEFT,        C_DOWN,        C_UP,          C_RIGHT,       TRNS,       TRNS,     k(KC_LEFT),    k(KC_DOWN),    k(KC_UP),      k(KC_RIGHT),      M_DEREF],
        [XXXX,     XXXX,          XXXX,          TRNS,          TRNS,          TRNS,       TRNS,     FN,            TRNS,          XXXX,          XXXX,             XXXX],
    ],
    // RAISE
    [
        [TRNS,     k(KC_BRKT_L),  k(KC_BRKT_R),  ls(k(KC_BRKT_L)), ls(k(KC_BRKT_R)), TRNS, TRNS,     ls(k(KC_BSLS)), k(KC_BSLS),   k(KC_EQ),      ls(k(KC_EQ)),     k(KC_DEL)],
        [TRNS,     S_1,           S_2,           S_3,           S_4,           S_5,        S_6,      S_7,           S_8,           S_9,           S_0,              S_MINUS],
        [TRNS,     TRNS,          TRNS,          TRNS,          TRNS,          TRNS,       TRNS,     k(KC_LEFT),    k(KC_DOWN),    k(KC_UP),      k(KC_RIGHT),      TRNS],
        [XXXX,     XXXX,          XXXX,          TRNS,          FN,            TRNS,       TRNS,     TRNS,          TRNS,          XXXX,          XXXX,             XXXX],
    ],
    // FN
    [
        [BL_RST,   TRNS,          TRNS,          TRNS,          TRNS,          TRNS,       TRNS,     TRNS,          TRNS,          TRNS,          TRNS,             TRNS],
        [TRNS,     TRNS,          TRNS,          TRNS,          RUN_BUILD,     TRNS,       TRNS,     RUN_TESTS,     TRNS,          TRNS,          TRNS,             TRNS],
        [TRNS,     TOG_L0,        TOG_L1,        TOG_L2,        TOG_L3,        TRNS,       TRNS,     TRNS,          L_B_DN,        L_B_UP,        TRNS,             TRNS],
        [XXXX,     XXXX,          XXXX,          TRNS,          TRNS,          TRNS,       TRNS,     TRNS,          TRNS,          XXXX,          XXXX,             XXXX],
    ],
    // SPLIT
    [
        [TRNS,     TRNS,          TRNS,          TRNS,          TRNS,          TRNS,       TRNS,     TRNS,          TRNS,          TRNS,          TRNS,             TRNS],
        [TRNS,     TRNS,          TRNS,          TRNS,          TRNS,          TRNS,       TRNS,     k(KC_BSPC),    k(KC_DEL),     TRNS,          TRNS,             TRNS],
        [SNAKE,    TRNS,          lc(k(KC_X)),   lc(k(KC_C)),   lc(k(KC_V)),   TRNS,       TRNS,     k(KC_PD),      k(KC_PU),      k(KC_END),     k(KC_HOME),       k(KC_CAPS)],
        [XXXX,     XXXX,          XXXX,          TRNS,          TRNS,          TRNS,       TRNS,     TRNS,          TRNS,          XXXX,          XXXX,             XXXX],
    ],
]);

pub static COMBOS: &[ComboDef] = &[
    ComboDef::pair(k(KC_E), k(KC_R), ls(k(KC_9))),      // (
    ComboDef::pair(k(KC_U), k(KC_I), ls(k(KC_0))),      // )
    ComboDef::pair(k(KC_C), k(KC_V), k(KC_BRKT_L)),     // [
    ComboDef::pair(k(KC_M), k(KC_COMMA), k(KC_BRKT_R)), // ]
    ComboDef::pair(k(KC_V), k(KC_B), ls(k(KC_BRKT_L))), // {
    ComboDef::pair(k(KC_N), k(KC_M), ls(k(KC_BRKT_R))), // }
    ComboDef::pair(k(KC_W), k(KC_E), k(KC_TAB)),
    ComboDef::pair(k(KC_I), k(KC_O), k(KC_TAB)),
    ComboDef::pair(k(KC_Q), k(KC_W), k(KC_CAPS)),
    ComboDef::pair(k(KC_P), k(KC_BSPC), M_DEREF),
];

pub static MACROS: &[MacroDef] = &[MacroDef::SendString("->")];
