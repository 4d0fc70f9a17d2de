use hxkb_common::util::NodePool;

use crate::config;
use crate::keyboard::{BoardHooks, send_plain};
use crate::keymap::{EntryKind, KeyEntry, Keymap};
use crate::keys;
use crate::layers::LayerBehavior;
use crate::matrix::MatrixView;
use crate::report::ReportBuilder;

#[derive(Clone, Copy, Default)]
struct TapHoldSlot {
    row: u8,
    col: u8,
    layer: u8,
    hold_counter: u16,
}

/// Per-key adjustment of the hold decision window, keyed on the tap
/// keycode of the entry. Strong fingers get a shorter window, weak
/// ones a longer one.
pub struct HoldTimeOffset {
    pub tap_keycode: u8,
    pub offset_ms: i16,
}

pub const DEFAULT_HOLD_TIME_OFFSETS: &[HoldTimeOffset] = &[
    HoldTimeOffset { tap_keycode: keys::KC_D, offset_ms: -50 },
    HoldTimeOffset { tap_keycode: keys::KC_K, offset_ms: -50 },
    HoldTimeOffset { tap_keycode: keys::KC_A, offset_ms: 100 },
    HoldTimeOffset { tap_keycode: keys::KC_L, offset_ms: 20 },
    HoldTimeOffset { tap_keycode: keys::KC_S, offset_ms: 20 },
];

/// Tap-hold (mod-tap) keys: a plain key when released inside the
/// decision window, a modifier decoration once the window elapses.
/// Resolution is purely time based; pressing other keys during the
/// window does not force a decision.
pub struct TapHoldBehavior {
    slots: NodePool<TapHoldSlot, { config::TAP_HOLD_SLOTS }>,
    offsets: &'static [HoldTimeOffset],
}

impl TapHoldBehavior {
    pub fn new() -> Self {
        Self::with_offsets(DEFAULT_HOLD_TIME_OFFSETS)
    }

    pub fn with_offsets(offsets: &'static [HoldTimeOffset]) -> Self {
        Self {
            slots: NodePool::new(),
            offsets,
        }
    }

    pub fn any_active(&self) -> bool {
        self.slots.any_active()
    }

    fn hold_time_for(&self, tap_keycode: u8) -> u16 {
        let mut time = config::TAP_HOLD_DELAY_MS as i32;
        for off in self.offsets {
            if off.tap_keycode == tap_keycode {
                time += off.offset_ms as i32;
                break;
            }
        }
        if time < config::SCAN_INTERVAL_MS as i32 {
            config::SCAN_INTERVAL_MS
        } else {
            time as u16
        }
    }

    pub fn on_key_press<const ROWS: usize, const COLS: usize>(
        &mut self,
        row: u8,
        col: u8,
        key: KeyEntry,
        current_layer: u8,
        matrix: &mut MatrixView<ROWS, COLS>,
    ) -> bool {
        if key.kind() != Some(EntryKind::TapHold) {
            return false;
        }

        match self.slots.alloc_tail() {
            Some(idx) => {
                *self.slots.get_mut(idx) = TapHoldSlot {
                    row,
                    col,
                    layer: current_layer,
                    hold_counter: 0,
                };
                matrix.mark_handled(row, col);
                true
            }
            // Pool exhausted: let the press fall through unmodified.
            None => false,
        }
    }

    pub fn on_key_release<
        const LAYERS: usize,
        const ROWS: usize,
        const COLS: usize,
        H: BoardHooks,
    >(
        &mut self,
        row: u8,
        col: u8,
        key: KeyEntry,
        keymap: &Keymap<LAYERS, ROWS, COLS>,
        layers: &LayerBehavior,
        builder: &mut ReportBuilder,
        hooks: &mut H,
    ) -> bool {
        let mut handled = false;
        let mut cursor = self.slots.active_head();

        while let Some(idx) = cursor {
            let next = self.slots.next_active(idx);
            let slot = *self.slots.get(idx);
            let tap_entry = keymap.resolve(
                slot.row as usize,
                slot.col as usize,
                layers.current() as usize,
                layers.base() as usize,
            );

            if tap_entry == key && slot.row == row && slot.col == col {
                handled = true;

                // Released inside the window: it was a tap.
                if slot.hold_counter < self.hold_time_for(tap_entry.keycode()) {
                    send_plain(tap_entry.tap_key(), builder, hooks);
                }

                self.slots.free(idx);
            }

            cursor = next;
        }

        handled
    }

    /// Advances every live slot by one scan interval. Once a slot
    /// reaches its hold time it contributes the hold decoration to
    /// each report until release. Returns whether any slot is still
    /// inside its decision window.
    pub fn update<const LAYERS: usize, const ROWS: usize, const COLS: usize, H: BoardHooks>(
        &mut self,
        keymap: &Keymap<LAYERS, ROWS, COLS>,
        layers: &LayerBehavior,
        builder: &mut ReportBuilder,
        hooks: &mut H,
    ) -> bool {
        let mut undetermined = false;
        let mut cursor = self.slots.active_head();

        while let Some(idx) = cursor {
            let next = self.slots.next_active(idx);
            let slot = *self.slots.get(idx);
            let entry = keymap.resolve(
                slot.row as usize,
                slot.col as usize,
                layers.current() as usize,
                layers.base() as usize,
            );
            let hold_time = self.hold_time_for(entry.keycode());

            // The counter saturates at the hold time; every tick past
            // that re-contributes the decoration to the fresh report.
            let counter = slot.hold_counter.saturating_add(config::SCAN_INTERVAL_MS);
            if counter > hold_time {
                self.slots.get_mut(idx).hold_counter = hold_time;
                send_plain(entry.decoration(), builder, hooks);
            } else {
                self.slots.get_mut(idx).hold_counter = counter;
                undetermined = true;
            }

            cursor = next;
        }

        undetermined
    }
}

impl Default for TapHoldBehavior {
    fn default() -> Self {
        Self::new()
    }
}
