//! Indirect target table and conditional history register.
//!
//! Indirect branches resolve to different targets over time, so a plain
//! address-tagged cache would thrash on them. This table hashes the branch
//! address with the outcomes of the most recent conditional branches,
//! giving each control path through the program its own slot. Slots store
//! bare targets with no tags: hash collisions silently overwrite each
//! other, an accepted accuracy/cost tradeoff that keeps every access O(1)
//! with zero bookkeeping.

/// Tagless indirect target table hashed with conditional branch history.
pub struct IndirectTargetTable {
    /// Stored targets, one per hash slot.
    table: Vec<u64>,
    /// Shift register of recent conditional outcomes, most recent in bit 0.
    history: u64,
    /// Confines the history to `log2(table.len())` bits.
    history_mask: u64,
}

impl IndirectTargetTable {
    /// Creates a table of `size` zeroed slots with a cleared history
    /// register.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not a power of two; the history register width
    /// is `log2(size)`.
    pub fn new(size: usize) -> Self {
        assert!(
            size.is_power_of_two(),
            "indirect table size must be a power of two"
        );
        Self {
            table: vec![0; size],
            history: 0,
            history_mask: size as u64 - 1,
        }
    }

    /// Hashes a branch address with the current history into a slot index.
    fn index(&self, pc: u64) -> usize {
        (((pc >> 2) ^ self.history) % self.table.len() as u64) as usize
    }

    /// Predicts the target for the indirect branch at `pc` under the
    /// current history. A never-written slot reads as address zero.
    pub fn predict(&self, pc: u64) -> u64 {
        self.table[self.index(pc)]
    }

    /// Stores the resolved target for `pc` under the current history,
    /// overwriting whatever the slot held.
    pub fn update(&mut self, pc: u64, target: u64) {
        let idx = self.index(pc);
        self.table[idx] = target;
    }

    /// Shifts a resolved conditional outcome into the history register.
    ///
    /// Only conditional branches feed the register; calls, returns, and
    /// unconditional jumps must not.
    pub fn record_outcome(&mut self, taken: bool) {
        self.history = ((self.history << 1) | u64::from(taken)) & self.history_mask;
    }

    /// Current value of the conditional history register.
    pub fn history(&self) -> u64 {
        self.history
    }

    /// Clears every slot and the history register.
    pub fn reset(&mut self) {
        self.table.fill(0);
        self.history = 0;
    }
}
