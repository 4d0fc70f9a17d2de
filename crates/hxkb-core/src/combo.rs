use crate::config;
use crate::keyboard::{BoardHooks, send_key};
use crate::keymap::KeyEntry;
use crate::layers::LayerBehavior;
use crate::macros::MacroBehavior;
use crate::matrix::MatrixView;
use crate::report::ReportBuilder;

/// A static combo definition: up to [`config::COMBO_KEYS_MAX`] keymap
/// entries that, pressed together inside the collection window, emit
/// `output` instead. Unused key slots hold [`KeyEntry::NONE`].
pub struct ComboDef {
    pub keys: [KeyEntry; config::COMBO_KEYS_MAX],
    pub output: KeyEntry,
}

impl ComboDef {
    pub const fn pair(a: KeyEntry, b: KeyEntry, output: KeyEntry) -> Self {
        Self {
            keys: [a, b, KeyEntry::NONE, KeyEntry::NONE],
            output,
        }
    }

    pub const fn triple(a: KeyEntry, b: KeyEntry, c: KeyEntry, output: KeyEntry) -> Self {
        Self {
            keys: [a, b, c, KeyEntry::NONE],
            output,
        }
    }

    pub const fn quad(
        a: KeyEntry,
        b: KeyEntry,
        c: KeyEntry,
        d: KeyEntry,
        output: KeyEntry,
    ) -> Self {
        Self {
            keys: [a, b, c, d],
            output,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ComboState {
    /// Unused slot; the first one terminates every table scan.
    #[default]
    Invalid,
    Inactive,
    /// At least one chord key held, collection timer running.
    Active,
    /// Cancelled; chord keys are swallowed until the suppress window
    /// elapses so stragglers of the half-chord do not type.
    Cooldown,
    /// Fired; re-arms once every chord key is up.
    WaitForAllReleased,
    /// The collection window elapsed with a single chord key down;
    /// that key repeats as itself.
    SingleHeld,
}

#[derive(Clone, Copy)]
struct ComboSlot {
    state: ComboState,
    elapsed: u8,
    keys_pressed: u8,
    positions: [(u8, u8); config::COMBO_KEYS_MAX],
    held_index: u8,
}

impl Default for ComboSlot {
    fn default() -> Self {
        Self {
            state: ComboState::Invalid,
            elapsed: 0,
            keys_pressed: 0,
            // (0, 0) is a real position; an unseen key must never
            // alias it.
            positions: [(0xff, 0xff); config::COMBO_KEYS_MAX],
            held_index: 0,
        }
    }
}

/// Chord detection over the static combo table. Matching is by keymap
/// entry equality against the resolved key of each press, searched in
/// table order.
pub struct ComboBehavior {
    defs: &'static [ComboDef],
    slots: [ComboSlot; config::COMBO_SLOTS],
}

impl ComboBehavior {
    pub fn new(defs: &'static [ComboDef]) -> Self {
        let mut slots = [ComboSlot::default(); config::COMBO_SLOTS];
        let count = defs.len().min(config::COMBO_SLOTS);
        for slot in slots.iter_mut().take(count) {
            slot.state = ComboState::Inactive;
        }
        Self { defs, slots }
    }

    fn key_index(def: &ComboDef, key: KeyEntry) -> Option<usize> {
        for (i, k) in def.keys.iter().enumerate() {
            if *k == key {
                return Some(i);
            }
            if k.is_none() {
                return None;
            }
        }
        None
    }

    fn defined_key_count(def: &ComboDef) -> usize {
        def.keys
            .iter()
            .position(|k| k.is_none())
            .unwrap_or(config::COMBO_KEYS_MAX)
    }

    fn is_complete(&self, i: usize) -> bool {
        let count = Self::defined_key_count(&self.defs[i]);
        let full = (1u8 << count) - 1;
        self.slots[i].keys_pressed & full == full
    }

    fn single_pressed_index(&self, i: usize) -> Option<usize> {
        let mask = self.slots[i].keys_pressed;
        if mask.count_ones() == 1 {
            Some(mask.trailing_zeros() as usize)
        } else {
            None
        }
    }

    fn start(&mut self, i: usize) {
        self.slots[i].state = ComboState::Active;
        self.slots[i].elapsed = 0;
        self.slots[i].keys_pressed = 0;
        self.slots[i].positions = [(0xff, 0xff); config::COMBO_KEYS_MAX];
    }

    fn record_key<const ROWS: usize, const COLS: usize>(
        &mut self,
        i: usize,
        key_index: usize,
        row: u8,
        col: u8,
        matrix: &mut MatrixView<ROWS, COLS>,
    ) {
        self.slots[i].keys_pressed |= 1 << key_index;
        self.slots[i].positions[key_index] = (row, col);
        matrix.mark_handled(row, col);
    }

    fn mark_keys_handled<const ROWS: usize, const COLS: usize>(
        &self,
        i: usize,
        matrix: &mut MatrixView<ROWS, COLS>,
    ) {
        for ki in 0..Self::defined_key_count(&self.defs[i]) {
            let (row, col) = self.slots[i].positions[ki];
            matrix.mark_handled(row, col);
        }
    }

    /// An unfinished combo sharing keys with one that just fired must
    /// not leak its collected presses: push the first such combo per
    /// shared key into cooldown.
    fn cooldown_overlapping(&mut self, fired: usize) {
        for ki in 0..Self::defined_key_count(&self.defs[fired]) {
            let key = self.defs[fired].keys[ki];
            for other in 0..self.slots.len() {
                if other == fired {
                    continue;
                }
                if self.slots[other].state == ComboState::Invalid {
                    break;
                }
                let Some(def) = self.defs.get(other) else {
                    break;
                };
                if Self::key_index(def, key).is_some() {
                    self.slots[other].state = ComboState::Cooldown;
                    self.slots[other].elapsed = 0;
                    break;
                }
            }
        }
    }

    pub fn on_key_press<const ROWS: usize, const COLS: usize, H: BoardHooks>(
        &mut self,
        row: u8,
        col: u8,
        key: KeyEntry,
        matrix: &mut MatrixView<ROWS, COLS>,
        layers: &mut LayerBehavior,
        macros: &mut MacroBehavior,
        builder: &mut ReportBuilder,
        hooks: &mut H,
    ) -> bool {
        let mut was_handled = false;

        for i in 0..self.slots.len() {
            if self.slots[i].state == ComboState::Invalid {
                break;
            }
            let Some(def) = self.defs.get(i) else {
                break;
            };
            let Some(ki) = Self::key_index(def, key) else {
                continue;
            };

            match self.slots[i].state {
                ComboState::Cooldown => {
                    // Swallow chord keys while cooling down.
                    was_handled = true;
                }
                ComboState::WaitForAllReleased => {
                    self.slots[i].keys_pressed |= 1 << ki;
                    was_handled = true;
                }
                ComboState::Inactive | ComboState::Active | ComboState::SingleHeld => {
                    was_handled = true;

                    if self.slots[i].state == ComboState::Inactive {
                        self.start(i);
                        self.record_key(i, ki, row, col, matrix);
                    } else if self.slots[i].state == ComboState::Active {
                        self.record_key(i, ki, row, col, matrix);
                    }

                    if self.slots[i].state == ComboState::Active && self.is_complete(i) {
                        send_key(self.defs[i].output, builder, hooks, layers, macros);
                        self.slots[i].state = ComboState::WaitForAllReleased;
                        self.mark_keys_handled(i, matrix);
                        self.cooldown_overlapping(i);
                    }
                }
                ComboState::Invalid => {}
            }
        }

        was_handled
    }

    /// Release transitions never claim the event; anything behind the
    /// combo stage in the chain still sees the release.
    pub fn on_key_release<H: BoardHooks>(
        &mut self,
        _row: u8,
        _col: u8,
        key: KeyEntry,
        layers: &mut LayerBehavior,
        macros: &mut MacroBehavior,
        builder: &mut ReportBuilder,
        hooks: &mut H,
    ) -> bool {
        for i in 0..self.slots.len() {
            if self.slots[i].state == ComboState::Invalid {
                break;
            }
            let Some(def) = self.defs.get(i) else {
                break;
            };
            let Some(ki) = Self::key_index(def, key) else {
                continue;
            };

            match self.slots[i].state {
                ComboState::Cooldown | ComboState::Inactive | ComboState::Invalid => {}
                ComboState::WaitForAllReleased => {
                    self.slots[i].keys_pressed &= !(1 << ki);
                    if self.slots[i].keys_pressed == 0 {
                        self.slots[i].state = ComboState::Inactive;
                    }
                }
                ComboState::SingleHeld => {
                    self.slots[i].state = ComboState::Inactive;
                }
                ComboState::Active => match self.single_pressed_index(i) {
                    // More than one chord key was down: cancel, and
                    // swallow the remainder through the cooldown.
                    None => {
                        self.slots[i].state = ComboState::Cooldown;
                        self.slots[i].elapsed = 0;
                        self.slots[i].keys_pressed &= !(1 << ki);
                    }
                    // Only this key was down: it was an ordinary
                    // press after all, emit it on its release.
                    Some(si) => {
                        send_key(self.defs[i].keys[si], builder, hooks, layers, macros);
                        self.slots[i].state = ComboState::Inactive;
                    }
                },
            }
        }

        false
    }

    /// Per-tick timers and swallowing. Returns whether any combo is
    /// still collecting, so the dispatcher keeps the remaining-keys
    /// emitter away from half-collected chords.
    pub fn update<const ROWS: usize, const COLS: usize, H: BoardHooks>(
        &mut self,
        matrix: &mut MatrixView<ROWS, COLS>,
        layers: &mut LayerBehavior,
        macros: &mut MacroBehavior,
        builder: &mut ReportBuilder,
        hooks: &mut H,
    ) -> bool {
        let mut unresolved = false;

        for i in 0..self.slots.len() {
            match self.slots[i].state {
                ComboState::Invalid => break,
                ComboState::Inactive => {}
                ComboState::Cooldown => {
                    self.slots[i].elapsed = self.slots[i]
                        .elapsed
                        .saturating_add(config::SCAN_INTERVAL_MS as u8);
                    if self.slots[i].elapsed >= config::COMBO_CANCEL_SUPPRESS_MS {
                        self.slots[i].state = ComboState::Inactive;
                    } else {
                        self.mark_keys_handled(i, matrix);
                    }
                }
                ComboState::WaitForAllReleased => {
                    self.mark_keys_handled(i, matrix);
                }
                ComboState::Active => {
                    unresolved = true;

                    self.slots[i].elapsed = self.slots[i]
                        .elapsed
                        .saturating_add(config::SCAN_INTERVAL_MS as u8);
                    if self.slots[i].elapsed >= config::COMBO_DELAY_MS {
                        match self.single_pressed_index(i) {
                            None => {
                                self.slots[i].state = ComboState::Cooldown;
                                self.slots[i].elapsed = 0;
                                self.mark_keys_handled(i, matrix);
                            }
                            Some(si) => {
                                // A single chord key outlived the
                                // window: it is just that key, held.
                                send_key(self.defs[i].keys[si], builder, hooks, layers, macros);
                                self.slots[i].state = ComboState::SingleHeld;
                                self.slots[i].held_index = si as u8;
                            }
                        }
                    }
                }
                ComboState::SingleHeld => {
                    let si = self.slots[i].held_index as usize;
                    send_key(self.defs[i].keys[si], builder, hooks, layers, macros);
                }
            }
        }

        unresolved
    }
}
