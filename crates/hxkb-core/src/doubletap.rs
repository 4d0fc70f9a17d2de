use hxkb_common::util::NodePool;

use crate::config;
use crate::keyboard::{BoardHooks, send_plain};
use crate::keymap::{EntryKind, KeyEntry, Keymap};
use crate::layers::LayerBehavior;
use crate::matrix::MatrixView;
use crate::report::ReportBuilder;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DtState {
    /// First press seen, waiting for its release.
    #[default]
    WaitFirstRelease,
    /// First tap complete, waiting for a second press.
    WaitSecondPress,
    /// Resolved to a single tap; emits the tap key until release.
    SingleTap,
    /// Resolved to a double tap; emits the decoration until release.
    DoubleTap,
}

#[derive(Clone, Copy, Default)]
struct DoubleTapSlot {
    row: u8,
    col: u8,
    layer: u8,
    elapsed: u8,
    state: DtState,
}

/// Double-tap keys. A single tap is emitted when the window times out
/// rather than on release, so the tap still lands while the key is
/// held. A second press inside the window emits the decorated variant
/// instead.
pub struct DoubleTapBehavior {
    slots: NodePool<DoubleTapSlot, { config::DOUBLE_TAP_SLOTS }>,
}

impl DoubleTapBehavior {
    pub fn new() -> Self {
        Self {
            slots: NodePool::new(),
        }
    }

    /// Finds the live slot whose position resolves (on the layer the
    /// slot was created on) to `key`. The second press of a pair finds
    /// the slot its first press created, even if the layer moved
    /// underneath it.
    fn find_active<const LAYERS: usize, const ROWS: usize, const COLS: usize>(
        &self,
        key: KeyEntry,
        keymap: &Keymap<LAYERS, ROWS, COLS>,
        base: u8,
    ) -> Option<usize> {
        self.slots.iter_active().find(|&idx| {
            let slot = self.slots.get(idx);
            keymap.resolve(
                slot.row as usize,
                slot.col as usize,
                slot.layer as usize,
                base as usize,
            ) == key
        })
    }

    pub fn on_key_press<const LAYERS: usize, const ROWS: usize, const COLS: usize>(
        &mut self,
        row: u8,
        col: u8,
        key: KeyEntry,
        keymap: &Keymap<LAYERS, ROWS, COLS>,
        layers: &LayerBehavior,
        matrix: &mut MatrixView<ROWS, COLS>,
    ) -> bool {
        if key.kind() != Some(EntryKind::DoubleTap) {
            return false;
        }

        match self.find_active(key, keymap, layers.base()) {
            None => match self.slots.alloc_tail() {
                Some(idx) => {
                    *self.slots.get_mut(idx) = DoubleTapSlot {
                        row,
                        col,
                        layer: layers.current(),
                        elapsed: 0,
                        state: DtState::WaitFirstRelease,
                    };
                    matrix.mark_handled(row, col);
                    true
                }
                // Pool exhausted: the press falls through unmodified.
                None => false,
            },
            Some(idx) => {
                let slot = self.slots.get_mut(idx);
                if slot.state == DtState::WaitSecondPress {
                    slot.state = DtState::DoubleTap;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn on_key_release<const LAYERS: usize, const ROWS: usize, const COLS: usize>(
        &mut self,
        _row: u8,
        _col: u8,
        key: KeyEntry,
        keymap: &Keymap<LAYERS, ROWS, COLS>,
        layers: &LayerBehavior,
    ) -> bool {
        if key.kind() != Some(EntryKind::DoubleTap) {
            return false;
        }

        let Some(idx) = self.find_active(key, keymap, layers.base()) else {
            return false;
        };

        let slot = self.slots.get_mut(idx);
        match slot.state {
            DtState::WaitFirstRelease => {
                slot.state = DtState::WaitSecondPress;
                true
            }
            DtState::SingleTap | DtState::DoubleTap => {
                // The outcome has been emitted; the release just ends
                // the key repeat.
                self.slots.free(idx);
                false
            }
            DtState::WaitSecondPress => false,
        }
    }

    /// Advances every live slot by one scan interval and emits the
    /// resolved outcome. Returns whether any slot is still inside its
    /// decision window.
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
            let mut slot = *self.slots.get(idx);
            let key = keymap.resolve(
                slot.row as usize,
                slot.col as usize,
                slot.layer as usize,
                layers.base() as usize,
            );

            let mut became_inactive = false;
            slot.elapsed = slot.elapsed.saturating_add(config::SCAN_INTERVAL_MS as u8);
            if slot.elapsed >= config::DOUBLE_TAP_DELAY_MS {
                slot.elapsed = config::DOUBLE_TAP_DELAY_MS;

                if slot.state != DtState::DoubleTap {
                    // Timing out while waiting for the second press
                    // means the key is up: emit one keydown and stop.
                    became_inactive = slot.state == DtState::WaitSecondPress;
                    slot.state = DtState::SingleTap;
                }
            } else {
                undetermined = true;
            }

            if slot.state == DtState::SingleTap {
                send_plain(key.tap_key(), builder, hooks);
            }
            if slot.state == DtState::DoubleTap {
                send_plain(key.decoration(), builder, hooks);
            }

            *self.slots.get_mut(idx) = slot;
            if became_inactive {
                self.slots.free(idx);
            }

            cursor = next;
        }

        undetermined
    }
}

impl Default for DoubleTapBehavior {
    fn default() -> Self {
        Self::new()
    }
}
