//! Per-core target prediction engine.
//!
//! One [`TargetPredictor`] instance is owned by each simulated core and is
//! driven through two pipeline hooks: `predict` at fetch and `update` at
//! retire/resolve, never concurrently for the same core. The engine routes
//! each branch kind to one of four fixed-capacity storage units; nothing
//! allocates at steady state and every lookup completes in
//! O(associativity) time.

/// Set-associative target cache for direct and conditional branches.
pub mod btb;
/// Adaptive call instruction size estimator.
pub mod call_size;
/// History-hashed indirect target table.
pub mod indirect;
/// Circular return address stack.
pub mod ras;

use tracing::{debug, info};

use self::btb::TargetCache;
use self::call_size::CallSizeEstimator;
use self::indirect::IndirectTargetTable;
use self::ras::ReturnAddressStack;
use crate::branch::BranchKind;
use crate::config::Config;

/// Per-core branch target prediction engine.
///
/// Owns the four storage structures and dispatches between them by branch
/// kind. Construct one instance per simulated core; cores share nothing,
/// so cross-core interference is impossible by construction.
///
/// # Examples
///
/// ```
/// use btbsim_core::{BranchKind, Config, TargetPredictor};
///
/// let mut bp = TargetPredictor::new(&Config::default());
///
/// // Cold call: no stored target yet, but the call site goes on the RAS.
/// let (target, always_taken) = bp.predict(0x1000, BranchKind::DirectCall, 1);
/// assert_eq!((target, always_taken), (0, true));
///
/// // Resolution trains the target cache.
/// bp.update(0x1000, 0x2000, true, BranchKind::DirectCall, 2);
/// assert_eq!(bp.predict(0x1000, BranchKind::DirectCall, 3), (0x2000, true));
/// ```
pub struct TargetPredictor {
    /// Set-associative cache for direct and conditional branch targets.
    targets: TargetCache,
    /// History-hashed table for indirect branch targets.
    indirect: IndirectTargetTable,
    /// Ring stack of call-site addresses.
    ras: ReturnAddressStack,
    /// Byte-length estimates used to turn call sites into return targets.
    call_sizes: CallSizeEstimator,
}

impl TargetPredictor {
    /// Builds a predictor with every structure pre-sized from `config` and
    /// every call-size slot at the default instruction width.
    ///
    /// # Panics
    ///
    /// Panics if the geometry violates [`Config::validate`]; validate
    /// host-supplied configuration before constructing.
    pub fn new(config: &Config) -> Self {
        info!(
            sets = config.targets.sets,
            ways = config.targets.ways,
            indirect_size = config.indirect.size,
            ras_capacity = config.ras.capacity,
            call_size_trackers = config.call_size.trackers,
            "target predictor initialized"
        );
        Self {
            targets: TargetCache::new(config.targets.sets, config.targets.ways),
            indirect: IndirectTargetTable::new(config.indirect.size),
            ras: ReturnAddressStack::new(config.ras.capacity),
            call_sizes: CallSizeEstimator::new(
                config.call_size.trackers,
                config.call_size.default_width,
            ),
        }
    }

    /// Predicts the target of the branch at `pc`, called once per fetched
    /// branch.
    ///
    /// Call kinds push `pc` onto the return address stack before the
    /// target is produced, whichever structure serves it. `now` is the
    /// host's monotonically non-decreasing cycle counter, used to stamp
    /// recency on target cache hits.
    ///
    /// # Returns
    ///
    /// `(target, always_taken)`. A zero target means no prediction. The
    /// flag is the stored taken streak on a target cache hit, `false` for
    /// a conditional branch that missed (trust the direction predictor),
    /// and `true` for every other kind.
    pub fn predict(&mut self, pc: u64, kind: BranchKind, now: u64) -> (u64, bool) {
        if kind.is_call() {
            self.ras.push(pc);
        }

        match kind {
            BranchKind::Return => {
                let call_site = self.ras.peek();
                let target = call_site.wrapping_add(self.call_sizes.estimate(call_site));
                (target, true)
            }
            BranchKind::Indirect | BranchKind::IndirectCall => (self.indirect.predict(pc), true),
            BranchKind::Conditional | BranchKind::Direct | BranchKind::DirectCall => self
                .targets
                .predict(pc, now)
                .unwrap_or((0, kind != BranchKind::Conditional)),
        }
    }

    /// Trains the predictor with a resolved branch, called once per
    /// retired branch after its `predict`.
    ///
    /// Routing by kind: indirect kinds overwrite their history-hashed
    /// slot; a conditional additionally shifts its outcome into the
    /// history register; a return pops the stack and recalibrates the
    /// call-size estimate for the popped call site; every non-indirect,
    /// non-return kind trains the target cache.
    pub fn update(&mut self, pc: u64, target: u64, taken: bool, kind: BranchKind, now: u64) {
        if kind.is_indirect() {
            self.indirect.update(pc, target);
        }

        if kind == BranchKind::Conditional {
            self.indirect.record_outcome(taken);
        }

        if kind == BranchKind::Return {
            let call_site = self.ras.pop();
            self.call_sizes.calibrate(call_site, target);
        } else if !kind.is_indirect() {
            self.targets.update(pc, target, taken, now);
        }
    }

    /// Zeroes all four structures and the history register, restoring
    /// call-size defaults, without reallocating.
    pub fn reset(&mut self) {
        debug!("target predictor reset");
        self.targets.reset();
        self.indirect.reset();
        self.ras.reset();
        self.call_sizes.reset();
    }
}
