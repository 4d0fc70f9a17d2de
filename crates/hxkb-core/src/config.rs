//! Core timing and capacity configuration. All timers tick in units of
//! [`SCAN_INTERVAL_MS`], so every delay should be a multiple of it.

/// Period of the matrix scan timer, in milliseconds.
pub const SCAN_INTERVAL_MS: u16 = 10;

/// Base decision window of a tap-hold key. Per-key offsets from
/// [`crate::taphold::HoldTimeOffset`] are added on top.
pub const TAP_HOLD_DELAY_MS: u16 = 200;

/// Window within which a second press turns a double-tap key into its
/// decorated variant.
pub const DOUBLE_TAP_DELAY_MS: u8 = 200;

/// Window within which all keys of a combo must arrive.
pub const COMBO_DELAY_MS: u8 = 50;

/// After a combo is cancelled, its chord keys are swallowed for this
/// long so a half-finished chord does not dribble through as bare
/// keystrokes.
pub const COMBO_CANCEL_SUPPRESS_MS: u8 = 150;

/// Concurrent tap-hold keys being tracked.
pub const TAP_HOLD_SLOTS: usize = 8;

/// Concurrent double-tap keys being tracked.
pub const DOUBLE_TAP_SLOTS: usize = 8;

/// Combo definition table size.
pub const COMBO_SLOTS: usize = 16;

/// Maximum chord size of a single combo.
pub const COMBO_KEYS_MAX: usize = 4;

/// Macro definition table size.
pub const MACRO_SLOTS: usize = 8;

/// Upper bound of key state changes processed in one scan. Edges past
/// this are dropped for the tick.
pub const MAX_EVENTS_PER_SCAN: usize = 64;
