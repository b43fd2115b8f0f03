//! Branch target cache.
//!
//! A set-associative cache mapping the address of a direct, direct-call, or
//! conditional branch to its most recently observed target. Indirect
//! branches and returns are served by dedicated structures; everything else
//! lands here. Victim selection is least-recently-used, reconstructed by
//! scanning the set's recency stamps at eviction time rather than
//! maintaining an explicit LRU list.

/// An entry in the target cache.
#[derive(Clone, Copy, Default)]
struct TargetEntry {
    /// Indicates if this entry contains valid data.
    valid: bool,
    /// Full branch address used to verify a set hit.
    tag: u64,
    /// The most recently observed target address.
    target: u64,
    /// True while the branch has resolved taken on every update since this
    /// entry was allocated; cleared permanently by the first not-taken
    /// resolution.
    always_taken: bool,
    /// Cycle of the most recent hit or update, for victim selection.
    last_used: u64,
}

/// Set-associative branch target cache.
pub struct TargetCache {
    /// Flat `sets * ways` storage; a set occupies `ways` adjacent slots.
    table: Vec<TargetEntry>,
    /// Number of sets.
    sets: usize,
    /// Associativity.
    ways: usize,
}

impl TargetCache {
    /// Creates a target cache of `sets * ways` entries, all invalid.
    ///
    /// # Panics
    ///
    /// Panics if `sets` or `ways` is zero.
    pub fn new(sets: usize, ways: usize) -> Self {
        assert!(
            sets > 0 && ways > 0,
            "target cache geometry must be non-zero"
        );
        Self {
            table: vec![TargetEntry::default(); sets * ways],
            sets,
            ways,
        }
    }

    /// Maps a branch address to its set index.
    ///
    /// The low two bits encode sub-instruction alignment and carry no
    /// entropy, so they are dropped before the modulo.
    fn set_index(&self, pc: u64) -> usize {
        ((pc >> 2) % self.sets as u64) as usize
    }

    /// Returns the set holding `pc` as a mutable slice of its ways.
    fn set_mut(&mut self, pc: u64) -> &mut [TargetEntry] {
        let start = self.set_index(pc) * self.ways;
        &mut self.table[start..start + self.ways]
    }

    /// Looks up the stored prediction for `pc`, refreshing its recency
    /// stamp with the current cycle on a hit.
    ///
    /// # Returns
    ///
    /// `Some((target, always_taken))` on a tag hit, `None` otherwise.
    pub fn predict(&mut self, pc: u64, now: u64) -> Option<(u64, bool)> {
        self.set_mut(pc)
            .iter_mut()
            .find(|e| e.valid && e.tag == pc)
            .map(|e| {
                e.last_used = now;
                (e.target, e.always_taken)
            })
    }

    /// Records the resolved target for `pc`.
    ///
    /// On a tag hit the entry is overwritten in place and its taken streak
    /// is ANDed with this resolution. On a miss an entry is allocated only
    /// for a taken branch with a non-zero target; a not-taken or
    /// zero-target miss leaves the set untouched.
    pub fn update(&mut self, pc: u64, target: u64, taken: bool, now: u64) {
        let set = self.set_mut(pc);

        if let Some(e) = set.iter_mut().find(|e| e.valid && e.tag == pc) {
            e.target = target;
            e.always_taken = e.always_taken && taken;
            e.last_used = now;
            return;
        }

        if !taken || target == 0 {
            return;
        }

        // Invalid ways sort before every valid one; among valid ways the
        // oldest stamp wins, first-encountered on ties.
        if let Some(victim) = set.iter_mut().min_by_key(|e| (e.valid, e.last_used)) {
            *victim = TargetEntry {
                valid: true,
                tag: pc,
                target,
                // Allocation only happens on a taken resolution, so the
                // streak starts true.
                always_taken: true,
                last_used: now,
            };
        }
    }

    /// Invalidates every entry.
    pub fn reset(&mut self) {
        self.table.fill(TargetEntry::default());
    }
}
