//! Call instruction size estimator.
//!
//! The return address stack records where a call instruction lives, not
//! where its return should land. The gap between the two is the call
//! instruction's byte length, which varies across ISAs and, on
//! variable-length ISAs, between call sites. This table keeps a running
//! per-address estimate, seeded with a default width and recalibrated from
//! every plausibly-sized return resolution.

/// Largest call-site-to-return-target distance accepted as a call
/// instruction length. Anything larger is noise from tail calls or a
/// mispredicted stack and must not disturb the stored estimate.
pub const MAX_CALL_BYTES: u64 = 10;

/// Per-address running estimate of call instruction byte lengths.
pub struct CallSizeEstimator {
    /// One estimate per hash slot, seeded with the default width.
    sizes: Vec<u64>,
    /// Width assigned to every slot at construction and reset.
    default_width: u64,
}

impl CallSizeEstimator {
    /// Creates an estimator of `trackers` slots, all at `default_width`.
    ///
    /// # Panics
    ///
    /// Panics if `trackers` is zero.
    pub fn new(trackers: usize, default_width: u64) -> Self {
        assert!(trackers > 0, "call size tracker count must be non-zero");
        Self {
            sizes: vec![default_width; trackers],
            default_width,
        }
    }

    /// Maps a call-site address to its slot. Low bits are kept: unlike the
    /// target tables, call sites need no alignment shift to discriminate.
    fn index(&self, pc: u64) -> usize {
        (pc % self.sizes.len() as u64) as usize
    }

    /// Estimated byte length of the call instruction at `call_pc`.
    ///
    /// Adding this to a call-site address from the return address stack
    /// yields the predicted return target.
    pub fn estimate(&self, call_pc: u64) -> u64 {
        self.sizes[self.index(call_pc)]
    }

    /// Recalibrates the estimate for `call_pc` from a resolved return.
    ///
    /// The absolute distance between call site and resolved target is
    /// stored as the new length when it is at most [`MAX_CALL_BYTES`];
    /// larger distances are discarded untouched. Slots are tagless, so
    /// aliasing call sites overwrite each other's estimates.
    pub fn calibrate(&mut self, call_pc: u64, return_target: u64) {
        let distance = call_pc.abs_diff(return_target);
        if distance <= MAX_CALL_BYTES {
            let idx = self.index(call_pc);
            self.sizes[idx] = distance;
        }
    }

    /// Restores every slot to the default width.
    pub fn reset(&mut self) {
        self.sizes.fill(self.default_width);
    }
}
