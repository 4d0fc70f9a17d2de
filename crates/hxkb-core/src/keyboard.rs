use heapless::Vec;
use hxkb_common::KeyState;

use crate::combo::{ComboBehavior, ComboDef};
use crate::config;
use crate::doubletap::DoubleTapBehavior;
use crate::keymap::{EntryKind, KeyEntry, Keymap};
use crate::layers::LayerBehavior;
use crate::macros::{MacroBehavior, MacroDef};
use crate::matrix::MatrixView;
use crate::report::{BootKeyboardReport, BootLeds, ReportBuilder};
use crate::taphold::{HoldTimeOffset, TapHoldBehavior};

/// Row/col reported to hooks for keys that did not come from a matrix
/// position (combo outputs, macro steps).
pub const VIRTUAL_KEY_POS: u8 = 0xff;

/// Outcome of a board hook that may claim a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    /// Not a key this board handles; the event continues down the
    /// chain.
    Ignored,
    /// Consumed for this tick.
    Handled,
    /// Consumed, and the physical press must stay invisible until the
    /// user lifts the key.
    HandledSuppressKey,
}

/// The capability set a board hands to the core. Everything has a
/// no-op default, so a board only writes the hooks it cares about.
pub trait BoardHooks {
    /// Runs before any plain key lands in the report; may rewrite the
    /// key in place. Returning `false` swallows the key entirely.
    fn before_send_key(&mut self, _key: &mut KeyEntry) -> bool {
        true
    }

    /// Firmware commands (`KeyEntry::kb_control`): LED controls,
    /// reset to bootloader, board-specific modes.
    fn on_kb_control_key(
        &mut self,
        _row: u8,
        _col: u8,
        _key: KeyEntry,
        _state: KeyState,
    ) -> HookResult {
        HookResult::Ignored
    }

    /// Mouse keys, if the board drives a pointer report.
    fn on_mouse_key(&mut self, _row: u8, _col: u8, _key: KeyEntry, _state: KeyState) -> bool {
        false
    }

    /// The current layer changed; boards typically repaint LEDs here.
    fn on_layer_change(&mut self, _layer: u8) {}

    /// Host LED state arrived through the OUT endpoint.
    fn on_led_status(&mut self, _leds: BootLeds) {}

    /// The tick pipeline finished and the report is final for this
    /// scan.
    fn on_scan_complete(&mut self, _report: &BootKeyboardReport) {}
}

/// Hooks for boards that need none of the customization points.
pub struct NullHooks;

impl BoardHooks for NullHooks {}

/// Emits a plain entry into the report: pre-send hook first, then the
/// modifier byte and keycode. Report overflow drops the keycode, per
/// boot protocol.
pub(crate) fn send_plain<H: BoardHooks>(
    entry: KeyEntry,
    builder: &mut ReportBuilder,
    hooks: &mut H,
) {
    let mut key = entry;
    if !hooks.before_send_key(&mut key) {
        return;
    }
    let _ = builder.push_entry(key);
}

/// Full key emission with virtual-key routing: plain entries land in
/// the report, everything else is dispatched to the behavior or hook
/// that owns it. Used for keys that originate inside the core (combo
/// outputs, single-key fallbacks) rather than from a matrix position.
pub(crate) fn send_key<H: BoardHooks>(
    entry: KeyEntry,
    builder: &mut ReportBuilder,
    hooks: &mut H,
    layers: &mut LayerBehavior,
    macros: &mut MacroBehavior,
) {
    match entry.kind() {
        Some(EntryKind::Plain) => send_plain(entry, builder, hooks),
        Some(EntryKind::Layer) => {
            layers.on_virtual_key(entry, hooks);
        }
        Some(EntryKind::Macro) => macros.start(entry.keycode()),
        Some(EntryKind::KbCtrl) => {
            hooks.on_kb_control_key(VIRTUAL_KEY_POS, VIRTUAL_KEY_POS, entry, KeyState::Pressed);
        }
        Some(EntryKind::Mouse) => {
            hooks.on_mouse_key(VIRTUAL_KEY_POS, VIRTUAL_KEY_POS, entry, KeyState::Pressed);
        }
        // Timed entries make no sense without a position; unknown
        // type nibbles are no key at all.
        Some(EntryKind::TapHold) | Some(EntryKind::DoubleTap) | None => {}
    }
}

#[derive(Clone, Copy)]
struct KeyEvent {
    row: u8,
    col: u8,
    state: KeyState,
}

/// The input-processing core: one value owning the matrix view, the
/// report under assembly and all behavior state. Constructed once at
/// init and driven by [`Keyboard::post_scan`] from the scan timer.
pub struct Keyboard<H, const LAYERS: usize, const ROWS: usize, const COLS: usize>
where
    H: BoardHooks,
{
    keymap: &'static Keymap<LAYERS, ROWS, COLS>,
    matrix: MatrixView<ROWS, COLS>,
    report: ReportBuilder,
    layers: LayerBehavior,
    taphold: TapHoldBehavior,
    doubletap: DoubleTapBehavior,
    combos: ComboBehavior,
    macros: MacroBehavior,
    hooks: H,
}

impl<H, const LAYERS: usize, const ROWS: usize, const COLS: usize> Keyboard<H, LAYERS, ROWS, COLS>
where
    H: BoardHooks,
{
    pub fn new(
        keymap: &'static Keymap<LAYERS, ROWS, COLS>,
        combos: &'static [ComboDef],
        macros: &'static [MacroDef],
        hooks: H,
    ) -> Self {
        Self {
            keymap,
            matrix: MatrixView::new(),
            report: ReportBuilder::new(),
            layers: LayerBehavior::new(0, LAYERS as u8),
            taphold: TapHoldBehavior::new(),
            doubletap: DoubleTapBehavior::new(),
            combos: ComboBehavior::new(combos),
            macros: MacroBehavior::new(macros),
            hooks,
        }
    }

    /// Replaces the per-key hold-delay offset table.
    pub fn hold_time_offsets(mut self, offsets: &'static [HoldTimeOffset]) -> Self {
        self.taphold = TapHoldBehavior::with_offsets(offsets);
        self
    }

    /// Runs one scan tick against the debounced sample, one bit per
    /// column. When it returns, [`Keyboard::report`] is the report for
    /// this tick and the scan-complete hook has run.
    pub fn post_scan(&mut self, sample: [u32; ROWS]) {
        self.matrix.begin_scan(sample);
        self.report.clear();

        // Releases are handled before presses within a tick; events
        // are snapshot first because handlers mutate the masks.
        let mut events: Vec<KeyEvent, { config::MAX_EVENTS_PER_SCAN }> = Vec::new();
        for row in 0..ROWS {
            let mut bits = self.matrix.released_this_scan_bits(row);
            while bits != 0 {
                let col = bits.trailing_zeros() as u8;
                bits &= bits - 1;
                let _ = events.push(KeyEvent {
                    row: row as u8,
                    col,
                    state: KeyState::Released,
                });
            }
        }
        for row in 0..ROWS {
            let mut bits = self.matrix.pressed_this_scan_bits(row);
            while bits != 0 {
                let col = bits.trailing_zeros() as u8;
                bits &= bits - 1;
                let _ = events.push(KeyEvent {
                    row: row as u8,
                    col,
                    state: KeyState::Pressed,
                });
            }
        }

        for ev in &events {
            let key = self.resolve_key(ev.row, ev.col);
            match ev.state {
                KeyState::Released => self.dispatch_release(ev.row, ev.col, key),
                KeyState::Pressed => self.dispatch_press(ev.row, ev.col, key),
            }
        }

        // While a macro plays it owns the report outright; nothing
        // else may type over it.
        if self.macros.any_active() {
            self.report.clear();
            self.macros.update(&mut self.report, &mut self.hooks);
            self.hooks.on_scan_complete(self.report.report());
            return;
        }

        let combos_unresolved = self.combos.update(
            &mut self.matrix,
            &mut self.layers,
            &mut self.macros,
            &mut self.report,
            &mut self.hooks,
        );
        let tapholds_unresolved = self.taphold.update(
            self.keymap,
            &self.layers,
            &mut self.report,
            &mut self.hooks,
        );
        let double_taps_unresolved = self.doubletap.update(
            self.keymap,
            &self.layers,
            &mut self.report,
            &mut self.hooks,
        );

        if !(combos_unresolved || tapholds_unresolved || double_taps_unresolved) {
            self.emit_remaining();
        }

        self.hooks.on_scan_complete(self.report.report());
    }

    /// First-claim-wins press chain: board commands, then macros,
    /// combos (unless a tap-hold is mid-decision and could be
    /// mistaken for a chord), layers, tap-hold, double-tap.
    fn dispatch_press(&mut self, row: u8, col: u8, key: KeyEntry) {
        match key.kind() {
            Some(EntryKind::KbCtrl) => {
                match self
                    .hooks
                    .on_kb_control_key(row, col, key, KeyState::Pressed)
                {
                    HookResult::Ignored => {}
                    HookResult::Handled => {
                        self.matrix.mark_handled(row, col);
                        return;
                    }
                    HookResult::HandledSuppressKey => {
                        self.matrix.suppress_key_until_release(row, col);
                        return;
                    }
                }
            }
            Some(EntryKind::Mouse) => {
                if self.hooks.on_mouse_key(row, col, key, KeyState::Pressed) {
                    self.matrix.mark_handled(row, col);
                    return;
                }
            }
            _ => {}
        }

        if self.macros.on_key_press(key) {
            return;
        }
        if !self.taphold.any_active()
            && self.combos.on_key_press(
                row,
                col,
                key,
                &mut self.matrix,
                &mut self.layers,
                &mut self.macros,
                &mut self.report,
                &mut self.hooks,
            )
        {
            return;
        }
        if self
            .layers
            .on_key_press(row, col, key, &mut self.matrix, &mut self.hooks)
        {
            return;
        }
        if self
            .taphold
            .on_key_press(row, col, key, self.layers.current(), &mut self.matrix)
        {
            return;
        }
        let _ = self.doubletap.on_key_press(
            row,
            col,
            key,
            self.keymap,
            &self.layers,
            &mut self.matrix,
        );
    }

    fn dispatch_release(&mut self, row: u8, col: u8, key: KeyEntry) {
        match key.kind() {
            Some(EntryKind::KbCtrl) => {
                if self
                    .hooks
                    .on_kb_control_key(row, col, key, KeyState::Released)
                    != HookResult::Ignored
                {
                    return;
                }
            }
            Some(EntryKind::Mouse) => {
                if self.hooks.on_mouse_key(row, col, key, KeyState::Released) {
                    return;
                }
            }
            _ => {}
        }

        if self.macros.on_key_release(key) {
            return;
        }
        if self.combos.on_key_release(
            row,
            col,
            key,
            &mut self.layers,
            &mut self.macros,
            &mut self.report,
            &mut self.hooks,
        ) {
            return;
        }
        if self
            .layers
            .on_key_release(row, col, key, &mut self.matrix, &mut self.hooks)
        {
            return;
        }
        if self.taphold.on_key_release(
            row,
            col,
            key,
            self.keymap,
            &self.layers,
            &mut self.report,
            &mut self.hooks,
        ) {
            return;
        }
        let _ = self
            .doubletap
            .on_key_release(row, col, key, self.keymap, &self.layers);
    }

    /// Emits every held, unclaimed, unsuppressed position whose entry
    /// is a plain key. Entries of other kinds are owned by their
    /// behaviors or hooks and never repeat from here.
    fn emit_remaining(&mut self) {
        for row in 0..ROWS {
            let mut bits = self.matrix.pressed_unhandled_bits(row);
            while bits != 0 {
                let col = bits.trailing_zeros() as u8;
                bits &= bits - 1;

                let key = self.resolve_key(row as u8, col);
                if key.kind() == Some(EntryKind::Plain) {
                    send_plain(key, &mut self.report, &mut self.hooks);
                }
            }
        }
    }

    /// The effective entry at a position on the current layer, with
    /// transparent fall-through to the base layer.
    pub fn resolve_key(&self, row: u8, col: u8) -> KeyEntry {
        self.keymap.resolve(
            row as usize,
            col as usize,
            self.layers.current() as usize,
            self.layers.base() as usize,
        )
    }

    /// The report assembled by the last [`Keyboard::post_scan`].
    pub fn report(&self) -> &BootKeyboardReport {
        self.report.report()
    }

    pub fn current_layer(&self) -> u8 {
        self.layers.current()
    }

    /// Host LED state from the USB OUT endpoint; forwarded to the
    /// board hook.
    pub fn led_status(&mut self, leds: BootLeds) {
        self.hooks.on_led_status(leds);
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use hxkb_common::KeyState;

    use super::{BoardHooks, HookResult, Keyboard};
    use crate::combo::ComboDef;
    use crate::keymap::{EntryKind, KeyEntry, Keymap};
    use crate::keys::*;
    use crate::macros::MacroDef;
    use crate::report::Modifiers;

    const KBC_TOGGLE_SNAKE_MODE: u16 = 0x0007;

    const MT_D: KeyEntry = KeyEntry::mod_tap(KeyEntry::key(KC_D), Modifiers::LSHIFT.bits());
    const DT_SPC_ENT: KeyEntry = KeyEntry::double_tap(KeyEntry::key(KC_SPC), KC_ENTER, 0);
    const GRV_ESC: KeyEntry = KeyEntry::tap_hold(KeyEntry::key(KC_ESC), KC_GRAVE, 0);
    const A: KeyEntry = KeyEntry::key(KC_A);
    const B: KeyEntry = KeyEntry::key(KC_B);
    const E: KeyEntry = KeyEntry::key(KC_E);
    const O: KeyEntry = KeyEntry::key(KC_O);
    const Q: KeyEntry = KeyEntry::key(KC_Q);
    const R: KeyEntry = KeyEntry::key(KC_R);
    const U: KeyEntry = KeyEntry::key(KC_U);
    const I: KeyEntry = KeyEntry::key(KC_I);
    const W: KeyEntry = KeyEntry::key(KC_W);
    const X: KeyEntry = KeyEntry::key(KC_X);
    const T: KeyEntry = KeyEntry::TRANS;

    static KEYMAP: Keymap<2, 2, 8> = Keymap::new([
        [
            [A, E, R, MT_D, DT_SPC_ENT, KeyEntry::mo(1), U, I],
            [
                B,
                KeyEntry::macro_index(0),
                KeyEntry::kb_control(KBC_TOGGLE_SNAKE_MODE),
                W,
                GRV_ESC,
                Q,
                O,
                T,
            ],
        ],
        [
            [X, T, T, T, T, T, T, T],
            [KeyEntry::key(KC_1), T, T, T, T, T, T, T],
        ],
    ]);

    static COMBOS: &[ComboDef] = &[
        ComboDef::pair(E, R, KeyEntry::key(KC_9).lshift()),
        ComboDef::pair(W, E, KeyEntry::key(KC_TAB)),
        ComboDef::triple(U, I, Q, KeyEntry::key(KC_0).lshift()),
        ComboDef::pair(B, O, KeyEntry::macro_index(0)),
    ];

    static MACROS: &[MacroDef] = &[MacroDef::SendString("->")];

    #[derive(Default)]
    struct TestHooks {
        snake_mode: bool,
        layer_changes: Vec<u8>,
    }

    impl BoardHooks for TestHooks {
        fn before_send_key(&mut self, key: &mut KeyEntry) -> bool {
            if self.snake_mode && key.mods_bits() == 0 && key.keycode() == KC_SPC {
                *key = KeyEntry::key(KC_MINUS).lshift();
            }
            true
        }

        fn on_kb_control_key(
            &mut self,
            _row: u8,
            _col: u8,
            key: KeyEntry,
            state: KeyState,
        ) -> HookResult {
            if key.kind() != Some(EntryKind::KbCtrl) {
                return HookResult::Ignored;
            }
            if state == KeyState::Pressed && key.command() == KBC_TOGGLE_SNAKE_MODE {
                self.snake_mode = !self.snake_mode;
                return HookResult::HandledSuppressKey;
            }
            HookResult::Handled
        }

        fn on_layer_change(&mut self, layer: u8) {
            self.layer_changes.push(layer);
        }
    }

    type TestKeyboard = Keyboard<TestHooks, 2, 2, 8>;

    fn keyboard() -> TestKeyboard {
        Keyboard::new(&KEYMAP, COMBOS, MACROS, TestHooks::default())
    }

    fn bit(col: usize) -> u32 {
        1 << col
    }

    #[track_caller]
    fn assert_report(kb: &TestKeyboard, mods: Modifiers, keys: &[u8]) {
        let report = kb.report();
        assert_eq!(report.modifier, mods.bits(), "modifier byte mismatch");
        assert_eq!(report.reserved, 0);
        let mut expected = [0u8; 6];
        expected[..keys.len()].copy_from_slice(keys);
        assert_eq!(report.keycodes, expected, "keycode slots mismatch");
    }

    #[test]
    fn test_plain_key_press_hold_release() {
        let mut kb = keyboard();

        kb.post_scan([bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_A]);

        for _ in 0..4 {
            kb.post_scan([bit(0), 0]);
            assert_report(&kb, Modifiers::empty(), &[KC_A]);
        }

        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_transparent_on_both_layers_is_no_key() {
        let mut kb = keyboard();
        kb.post_scan([0, bit(7)]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_mod_tap_quick_release_is_tap() {
        let mut kb = keyboard();

        // Held for 80 ms: inside the window, nothing emitted yet.
        for _ in 0..8 {
            kb.post_scan([bit(3), 0]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }

        // The tap lands in the report of the release tick.
        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_D]);

        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_mod_tap_hold_becomes_modifier() {
        let mut kb = keyboard();

        // KC_D carries a -50 ms offset: decision at 150 ms, which is
        // the 16th tick counting the press tick.
        for _ in 0..15 {
            kb.post_scan([bit(3), 0]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }
        kb.post_scan([bit(3), 0]);
        assert_report(&kb, Modifiers::LSHIFT, &[]);

        // The modifier repeats every tick of the hold, and other keys
        // combine with it.
        kb.post_scan([bit(3) | bit(0), 0]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_A]);

        // Releasing after the decision emits no tap.
        kb.post_scan([bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_A]);
    }

    #[test]
    fn test_mod_tap_suppresses_other_keys_until_decided() {
        let mut kb = keyboard();

        kb.post_scan([bit(3), 0]);
        kb.post_scan([bit(3) | bit(0), 0]);
        // A is withheld while the tap-hold is undecided.
        assert_report(&kb, Modifiers::empty(), &[]);

        // Timing-only resolution: the interleaved press did not force
        // a decision, the timer did.
        for _ in 0..13 {
            kb.post_scan([bit(3) | bit(0), 0]);
        }
        kb.post_scan([bit(3) | bit(0), 0]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_A]);
    }

    #[test]
    fn test_tap_hold_with_keycode_hold() {
        let mut kb = keyboard();

        // Escape taps, grave after the default 200 ms hold.
        for _ in 0..20 {
            kb.post_scan([0, bit(4)]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }
        kb.post_scan([0, bit(4)]);
        assert_report(&kb, Modifiers::empty(), &[KC_GRAVE]);

        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_combo_fires_on_chord() {
        let mut kb = keyboard();

        kb.post_scan([bit(1), 0]);
        assert_report(&kb, Modifiers::empty(), &[]);

        // Second chord key completes the combo on its press tick.
        kb.post_scan([bit(1) | bit(2), 0]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_9]);

        // Chord keys never leak while held.
        for _ in 0..6 {
            kb.post_scan([bit(1) | bit(2), 0]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }

        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_combo_rearms_after_release() {
        let mut kb = keyboard();

        kb.post_scan([bit(1) | bit(2), 0]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_9]);
        kb.post_scan([0, 0]);

        kb.post_scan([bit(1) | bit(2), 0]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_9]);
    }

    #[test]
    fn test_combo_key_tapped_alone_emits_on_release() {
        let mut kb = keyboard();

        kb.post_scan([bit(1), 0]);
        kb.post_scan([bit(1), 0]);
        assert_report(&kb, Modifiers::empty(), &[]);

        // Released before the window closed with no partner: the key
        // was an ordinary press and lands on the release tick.
        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_E]);
        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_combo_key_held_past_window_repeats() {
        let mut kb = keyboard();

        // E alone for the whole 50 ms window.
        for _ in 0..4 {
            kb.post_scan([bit(1), 0]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }

        // Promoted to a plain held key; repeats every tick.
        kb.post_scan([bit(1), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_E]);
        kb.post_scan([bit(1), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_E]);

        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_combo_cancelled_chord_is_swallowed_through_cooldown() {
        let mut kb = keyboard();

        // Two of the three U+I+Q chord keys.
        kb.post_scan([bit(6) | bit(7), 0]);
        assert_report(&kb, Modifiers::empty(), &[]);

        // Releasing one with two collected cancels into cooldown.
        kb.post_scan([bit(7), 0]);
        assert_report(&kb, Modifiers::empty(), &[]);

        // The survivor is swallowed for the whole suppress window.
        for _ in 0..13 {
            kb.post_scan([bit(7), 0]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }

        // Cooldown over: the still-held key types as itself again.
        kb.post_scan([bit(7), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_I]);
    }

    #[test]
    fn test_fired_combo_cools_down_overlapping_combo() {
        let mut kb = keyboard();

        // E+R fires; W+E shares E and must not half-trigger.
        kb.post_scan([bit(1) | bit(2), 0]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_9]);
        kb.post_scan([0, 0]);

        // W+E inside the cooldown window: no Tab.
        for _ in 0..6 {
            kb.post_scan([bit(1), bit(3)]);
            assert_ne!(kb.report().keycodes[0], KC_TAB);
            assert_ne!(kb.report().keycodes[1], KC_TAB);
        }
    }

    #[test]
    fn test_double_tap_second_press_emits_decoration() {
        let mut kb = keyboard();

        for _ in 0..3 {
            kb.post_scan([bit(4), 0]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }
        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);

        // Second press inside the window: the decorated key, while
        // the key is held.
        kb.post_scan([bit(4), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_ENTER]);
        kb.post_scan([bit(4), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_ENTER]);

        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_double_tap_timeout_while_held_is_single_tap() {
        let mut kb = keyboard();

        // Held straight through the window: the tap appears while the
        // key is still down, and repeats until release.
        for _ in 0..19 {
            kb.post_scan([bit(4), 0]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }
        kb.post_scan([bit(4), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_SPC]);
        kb.post_scan([bit(4), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_SPC]);

        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_double_tap_timeout_after_release_is_one_keydown() {
        let mut kb = keyboard();

        for _ in 0..3 {
            kb.post_scan([bit(4), 0]);
        }
        kb.post_scan([0, 0]);

        // No second press: the window runs out and exactly one tap
        // keydown is emitted.
        let mut taps = 0;
        for _ in 0..20 {
            kb.post_scan([0, 0]);
            if kb.report().keycodes[0] == KC_SPC {
                taps += 1;
            }
        }
        assert_eq!(taps, 1);
    }

    #[test]
    fn test_momentary_layer_switch_and_suppression() {
        let mut kb = keyboard();

        kb.post_scan([bit(5), 0]);
        assert_eq!(kb.current_layer(), 1);
        assert_report(&kb, Modifiers::empty(), &[]);

        // (0,0) is X on the raised layer.
        kb.post_scan([bit(5) | bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_X]);

        // Dropping the layer suppresses the held key: it must not
        // turn into the base-layer A mid-press.
        kb.post_scan([bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
        kb.post_scan([bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[]);

        // A fresh press after release types the base key.
        kb.post_scan([0, 0]);
        kb.post_scan([bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_A]);

        assert_eq!(kb.hooks().layer_changes, std::vec![1, 0]);
    }

    #[test]
    fn test_transparent_falls_through_on_raised_layer() {
        let mut kb = keyboard();

        kb.post_scan([bit(5), 0]);
        kb.post_scan([bit(5) | bit(6), 0]);
        // (0,6) is transparent on layer 1; the base layer has U, but
        // U is a combo key, so it collects first and repeats as a
        // single held key after the window.
        for _ in 0..5 {
            kb.post_scan([bit(5) | bit(6), 0]);
        }
        assert_report(&kb, Modifiers::empty(), &[KC_U]);
    }

    #[test]
    fn test_macro_plays_one_char_per_tick() {
        let mut kb = keyboard();

        // "->": dash on the starting tick, shifted dot on the next.
        kb.post_scan([0, bit(1)]);
        assert_report(&kb, Modifiers::empty(), &[KC_MINUS]);
        kb.post_scan([0, bit(1)]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_DOT]);

        // Finished; the held macro key does not retrigger or type.
        kb.post_scan([0, bit(1)]);
        assert_report(&kb, Modifiers::empty(), &[]);
        kb.post_scan([0, 0]);
        assert_report(&kb, Modifiers::empty(), &[]);
    }

    #[test]
    fn test_macro_owns_report_over_held_keys() {
        let mut kb = keyboard();

        kb.post_scan([bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_A]);

        // While the macro plays, the held A is absent from the
        // report; it returns once playback ends.
        kb.post_scan([bit(0), bit(1)]);
        assert_report(&kb, Modifiers::empty(), &[KC_MINUS]);
        kb.post_scan([bit(0), bit(1)]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_DOT]);
        kb.post_scan([bit(0), bit(1)]);
        assert_report(&kb, Modifiers::empty(), &[KC_A]);
    }

    #[test]
    fn test_combo_output_can_start_a_macro() {
        let mut kb = keyboard();

        // B+O's output is the macro trigger; playback starts on the
        // firing tick.
        kb.post_scan([0, bit(0) | bit(6)]);
        assert_report(&kb, Modifiers::empty(), &[KC_MINUS]);
        kb.post_scan([0, bit(0) | bit(6)]);
        assert_report(&kb, Modifiers::LSHIFT, &[KC_DOT]);
    }

    #[test]
    fn test_kb_control_key_is_suppressed_and_toggles() {
        let mut kb = keyboard();

        kb.post_scan([0, bit(2)]);
        assert_report(&kb, Modifiers::empty(), &[]);
        assert!(kb.hooks().snake_mode);

        // Suppressed until release: holding it does not retrigger.
        for _ in 0..5 {
            kb.post_scan([0, bit(2)]);
            assert_report(&kb, Modifiers::empty(), &[]);
        }
        assert!(kb.hooks().snake_mode);

        kb.post_scan([0, 0]);
        kb.post_scan([0, bit(2)]);
        assert!(!kb.hooks().snake_mode);
    }

    #[test]
    fn test_before_send_key_rewrites_space_in_snake_mode() {
        let mut kb = keyboard();

        // Toggle snake mode on, release the command key.
        kb.post_scan([0, bit(2)]);
        kb.post_scan([0, 0]);

        // Hold the space double-tap through its window: the single
        // tap resolves to space, which the hook turns into a shifted
        // dash.
        for _ in 0..20 {
            kb.post_scan([bit(4), 0]);
        }
        assert_report(&kb, Modifiers::LSHIFT, &[KC_MINUS]);
    }

    #[test]
    fn test_releases_processed_before_presses() {
        let mut kb = keyboard();

        // Release the mod-tap and press A in the very same scan: the
        // release resolves to a tap before A is dispatched, so both
        // land in this report, tap first.
        kb.post_scan([bit(3), 0]);
        kb.post_scan([bit(0), 0]);
        assert_report(&kb, Modifiers::empty(), &[KC_D, KC_A]);
    }
}
