use hxkb_common::util::BitMatrix;

/// The per-tick view of the key matrix the behaviors operate on: the
/// debounced pressed state, the press/release edges of this scan, and
/// two masks the behaviors use to talk to each other.
///
/// * `handled` is per-tick: some behavior claimed this position for
///   this tick, so the remaining-keys emitter must not fire it. It is
///   cleared at the start of every scan.
/// * `suppressed` is sticky: the physical press at this position must
///   be ignored until the user lifts the key. Each bit clears itself
///   on the release of its position.
pub struct MatrixView<const ROWS: usize, const COLS: usize> {
    pressed: BitMatrix<ROWS>,
    pressed_this_scan: BitMatrix<ROWS>,
    released_this_scan: BitMatrix<ROWS>,
    handled: BitMatrix<ROWS>,
    suppressed: BitMatrix<ROWS>,
}

impl<const ROWS: usize, const COLS: usize> MatrixView<ROWS, COLS> {
    const COL_MASK: u32 = if COLS >= 32 {
        u32::MAX
    } else {
        (1u32 << COLS) - 1
    };

    const fn assert_dims() {
        assert!(ROWS > 0, "Matrix must have at least one row");
        assert!(COLS > 0 && COLS <= 32, "Matrix rows are stored as u32 bitmaps");
    }

    pub const fn new() -> Self {
        const { Self::assert_dims() }

        Self {
            pressed: BitMatrix::new(),
            pressed_this_scan: BitMatrix::new(),
            released_this_scan: BitMatrix::new(),
            handled: BitMatrix::new(),
            suppressed: BitMatrix::new(),
        }
    }

    /// Feeds the debounced sample of this scan, one bit per column,
    /// computing the edge bitmaps against the previous scan. Clears
    /// `handled`, and clears `suppressed` bits whose position
    /// released.
    pub fn begin_scan(&mut self, sample: [u32; ROWS]) {
        for row in 0..ROWS {
            let current = sample[row] & Self::COL_MASK;
            let prev = self.pressed.row_bits(row);

            self.pressed_this_scan.set_row_bits(row, current & !prev);
            self.released_this_scan.set_row_bits(row, prev & !current);
            self.suppressed
                .set_row_bits(row, self.suppressed.row_bits(row) & current);
            self.handled.set_row_bits(row, 0);
            self.pressed.set_row_bits(row, current);
        }
    }

    /// Whether the key is held, excluding suppressed positions.
    /// `include_handled` controls whether positions already claimed
    /// this tick count as pressed.
    pub fn is_pressed(&self, row: u8, col: u8, include_handled: bool) -> bool {
        let (r, c) = (row as usize, col as usize);
        if !self.pressed.get(r, c) || self.suppressed.get(r, c) {
            return false;
        }
        include_handled || !self.handled.get(r, c)
    }

    pub fn pressed_this_scan(&self, row: u8, col: u8) -> bool {
        self.pressed_this_scan.get(row as usize, col as usize)
    }

    pub fn released_this_scan(&self, row: u8, col: u8) -> bool {
        self.released_this_scan.get(row as usize, col as usize)
    }

    /// Claims this position for the current tick.
    pub fn mark_handled(&mut self, row: u8, col: u8) {
        if (row as usize) < ROWS && (col as usize) < COLS {
            self.handled.set(row as usize, col as usize, true);
        }
    }

    /// Ignores every currently held key until its release. Used when
    /// a momentary layer drops so held keys do not turn into
    /// base-layer keys mid-press.
    pub fn suppress_held_until_release(&mut self) {
        for row in 0..ROWS {
            self.suppressed
                .set_row_bits(row, self.suppressed.row_bits(row) | self.pressed.row_bits(row));
        }
    }

    /// Ignores one position until its release, if it is currently
    /// held.
    pub fn suppress_key_until_release(&mut self, row: u8, col: u8) {
        if self.pressed.get(row as usize, col as usize) {
            self.suppressed.set(row as usize, col as usize, true);
        }
    }

    pub(crate) fn pressed_this_scan_bits(&self, row: usize) -> u32 {
        self.pressed_this_scan.row_bits(row)
    }

    pub(crate) fn released_this_scan_bits(&self, row: usize) -> u32 {
        self.released_this_scan.row_bits(row)
    }

    /// Positions the remaining-keys emitter may fire: held, not
    /// claimed this tick, not suppressed.
    pub(crate) fn pressed_unhandled_bits(&self, row: usize) -> u32 {
        self.pressed.row_bits(row) & !self.handled.row_bits(row) & !self.suppressed.row_bits(row)
    }

    #[cfg(test)]
    fn pressed_bits(&self, row: usize) -> u32 {
        self.pressed.row_bits(row)
    }
}

impl<const ROWS: usize, const COLS: usize> Default for MatrixView<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}
