use hxkb_common::dev_warn;

use crate::keyboard::BoardHooks;
use crate::keymap::{EntryKind, KeyEntry, LAYER_OP_MO};
use crate::matrix::MatrixView;

/// Momentary layer switching. Outside of a held `MO(n)` key the
/// current layer always equals the base layer; there is no layer
/// stack, the last press wins.
pub struct LayerBehavior {
    base: u8,
    current: u8,
    num_layers: u8,
}

impl LayerBehavior {
    pub fn new(base: u8, num_layers: u8) -> Self {
        Self {
            base: if base < num_layers { base } else { 0 },
            current: if base < num_layers { base } else { 0 },
            num_layers,
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    pub fn set<H: BoardHooks>(&mut self, layer: u8, hooks: &mut H) {
        if layer >= self.num_layers {
            dev_warn!("Requested layer out of bounds: {}", layer);
            return;
        }
        self.current = layer;
        hooks.on_layer_change(layer);
    }

    pub fn on_key_press<const ROWS: usize, const COLS: usize, H: BoardHooks>(
        &mut self,
        row: u8,
        col: u8,
        key: KeyEntry,
        matrix: &mut MatrixView<ROWS, COLS>,
        hooks: &mut H,
    ) -> bool {
        if key.kind() != Some(EntryKind::Layer) || key.layer_op() != LAYER_OP_MO {
            return false;
        }

        // Momentary switch is only active while the key is held.
        self.set(key.keycode(), hooks);
        matrix.mark_handled(row, col);
        true
    }

    pub fn on_key_release<const ROWS: usize, const COLS: usize, H: BoardHooks>(
        &mut self,
        _row: u8,
        _col: u8,
        key: KeyEntry,
        matrix: &mut MatrixView<ROWS, COLS>,
        hooks: &mut H,
    ) -> bool {
        if key.kind() != Some(EntryKind::Layer) || key.layer_op() != LAYER_OP_MO {
            return false;
        }

        self.set(self.base, hooks);

        // Keys that were pressed on the dropped layer must not become
        // base-layer keys mid-press.
        matrix.suppress_held_until_release();
        true
    }

    /// A layer entry arriving through `send_key` rather than a matrix
    /// position (combo output, macro step).
    pub fn on_virtual_key<H: BoardHooks>(&mut self, key: KeyEntry, hooks: &mut H) -> bool {
        if key.kind() != Some(EntryKind::Layer) || key.layer_op() != LAYER_OP_MO {
            return false;
        }
        self.set(key.keycode(), hooks);
        true
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::LayerBehavior;
    use crate::keyboard::NullHooks;
    use crate::keymap::KeyEntry;
    use crate::keys;
    use crate::matrix::MatrixView;

    #[test]
    fn test_mo_press_and_release_round_trip() {
        let mut layers = LayerBehavior::new(0, 4);
        let mut matrix = MatrixView::<2, 4>::new();
        let mut hooks = NullHooks;

        matrix.begin_scan([0b0001, 0]);
        assert!(layers.on_key_press(0, 0, KeyEntry::mo(2), &mut matrix, &mut hooks));
        assert_eq!(layers.current(), 2);
        // The MO key itself is claimed for this tick.
        assert!(!matrix.is_pressed(0, 0, false));

        assert!(layers.on_key_release(0, 0, KeyEntry::mo(2), &mut matrix, &mut hooks));
        assert_eq!(layers.current(), 0);
    }

    #[test]
    fn test_release_suppresses_held_keys() {
        let mut layers = LayerBehavior::new(0, 4);
        let mut matrix = MatrixView::<1, 4>::new();
        let mut hooks = NullHooks;

        // MO held on col 0, another key held on col 2.
        matrix.begin_scan([0b0101]);
        layers.on_key_press(0, 0, KeyEntry::mo(1), &mut matrix, &mut hooks);
        matrix.begin_scan([0b0100]);
        layers.on_key_release(0, 0, KeyEntry::mo(1), &mut matrix, &mut hooks);
        assert!(!matrix.is_pressed(0, 2, true));
    }

    #[test]
    fn test_out_of_range_layer_is_ignored() {
        let mut layers = LayerBehavior::new(0, 2);
        let mut hooks = NullHooks;
        layers.set(7, &mut hooks);
        assert_eq!(layers.current(), 0);
    }

    #[test]
    fn test_non_layer_keys_are_not_claimed() {
        let mut layers = LayerBehavior::new(0, 2);
        let mut matrix = MatrixView::<1, 4>::new();
        let mut hooks = NullHooks;
        assert!(!layers.on_key_press(0, 0, KeyEntry::key(keys::KC_A), &mut matrix, &mut hooks));
        assert!(!layers.on_virtual_key(KeyEntry::key(keys::KC_A), &mut hooks));
    }
}
