use bitflags::bitflags;
use zerocopy::{Immutable, IntoBytes, KnownLayout};

use crate::keymap::KeyEntry;
use crate::keys;

bitflags! {
    /// The modifier bitmap of the boot-protocol keyboard report
    /// (byte 0). Bit positions follow the HID usage IDs of the
    /// modifier keys: `usage & 0xf` is the bit index.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const LCTRL  = 1 << 0;
        const LSHIFT = 1 << 1;
        const LALT   = 1 << 2;
        const LGUI   = 1 << 3;
        const RCTRL  = 1 << 4;
        const RSHIFT = 1 << 5;
        const RALT   = 1 << 6;
        const RGUI   = 1 << 7;
    }
}

bitflags! {
    /// Keyboard LED states reported by the host through the boot
    /// protocol OUT report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BootLeds: u8 {
        const NUM_LOCK    = 0b00000001;
        const CAPS_LOCK   = 0b00000010;
        const SCROLL_LOCK = 0b00000100;
        const COMPOSE     = 0b00001000;
        const KANA        = 0b00010000;
    }
}

/// The 8-byte boot-protocol keyboard IN report. `as_bytes()` is the
/// buffer the USB layer transmits verbatim.
#[derive(IntoBytes, Immutable, KnownLayout, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct BootKeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: [u8; 6],
}

const _: () = assert!(size_of::<BootKeyboardReport>() == 8);

impl BootKeyboardReport {
    pub const fn new() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0u8; 6],
        }
    }
}

impl Default for BootKeyboardReport {
    fn default() -> Self {
        Self::new()
    }
}

/// The optional consumer-control IN report: a single 16-bit usage ID
/// from the Consumer page, zero when idle. Board code fills it from
/// its own key handlers; the core only defines the wire shape.
#[derive(IntoBytes, Immutable, KnownLayout, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct ConsumerControlReport {
    pub usage: u16,
}

impl ConsumerControlReport {
    pub const fn new() -> Self {
        Self { usage: 0 }
    }
}

/// Returned by [`ReportBuilder::add_key`] when all six keycode slots
/// are taken. The boot protocol has no better answer than dropping
/// the key, but the condition is visible to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOverflow;

/// Assembles the outgoing keyboard report over the course of one scan
/// tick. Cleared at the top of every tick; whatever the behaviors
/// push during the tick is the report.
pub struct ReportBuilder {
    report: BootKeyboardReport,
    press_count: u8,
}

impl ReportBuilder {
    pub const fn new() -> Self {
        Self {
            report: BootKeyboardReport::new(),
            press_count: 0,
        }
    }

    pub fn clear(&mut self) {
        self.report = BootKeyboardReport::new();
        self.press_count = 0;
    }

    pub fn add_modifiers(&mut self, mods: Modifiers) {
        self.report.modifier |= mods.bits();
    }

    /// Adds one keycode. Modifier-range usages fold into the modifier
    /// byte, duplicates are ignored, and the seventh distinct keycode
    /// of a tick overflows.
    pub fn add_key(&mut self, kc: u8) -> Result<(), ReportOverflow> {
        if kc == keys::KC_NONE {
            return Ok(());
        }

        if (keys::KC_LCTL..=keys::KC_RGUI).contains(&kc) {
            self.report.modifier |= 1 << (kc & 0xf);
            return Ok(());
        }

        if self.report.keycodes.contains(&kc) {
            return Ok(());
        }

        if self.press_count >= 6 {
            return Err(ReportOverflow);
        }

        self.report.keycodes[self.press_count as usize] = kc;
        self.press_count += 1;
        Ok(())
    }

    /// Adds a resolved plain entry: its modifier byte plus its
    /// keycode. The modifiers land even when the keycode overflows.
    pub fn push_entry(&mut self, entry: KeyEntry) -> Result<(), ReportOverflow> {
        self.report.modifier |= entry.mods_bits();
        self.add_key(entry.keycode())
    }

    pub fn report(&self) -> &BootKeyboardReport {
        &self.report
    }

    pub fn press_count(&self) -> u8 {
        self.press_count
    }
}
