//! Dispatch Layer Tests.
//!
//! Drives the per-core engine through its public `predict`/`update` hooks
//! and verifies that every branch kind reaches the right structure, that
//! call kinds feed the return address stack, and that only conditional
//! outcomes move the history register.

use btbsim_core::{BranchKind, Config, TargetPredictor};

use crate::common::tiny_config;

// ══════════════════════════════════════════════════════════
// 1. Fetch-to-retire round trips
// ══════════════════════════════════════════════════════════

#[test]
fn call_round_trip_trains_the_target_cache() {
    let mut bp = TargetPredictor::new(&Config::default());

    // Cold call: no stored target, unconditional hint, call site pushed.
    assert_eq!(bp.predict(0x1000, BranchKind::DirectCall, 1), (0, true));

    bp.update(0x1000, 0x2000, true, BranchKind::DirectCall, 2);
    assert_eq!(bp.predict(0x1000, BranchKind::DirectCall, 3), (0x2000, true));
}

#[test]
fn conditional_miss_defers_to_the_direction_predictor() {
    let mut bp = TargetPredictor::new(&tiny_config());
    assert_eq!(bp.predict(0x3000, BranchKind::Conditional, 1), (0, false));
}

#[test]
fn unconditional_miss_hints_taken() {
    let mut bp = TargetPredictor::new(&tiny_config());
    assert_eq!(bp.predict(0x3000, BranchKind::Direct, 1), (0, true));
}

#[test]
fn conditional_round_trip_carries_the_decayed_streak() {
    let mut bp = TargetPredictor::new(&tiny_config());
    bp.update(0x100, 0x200, true, BranchKind::Conditional, 1);
    assert_eq!(bp.predict(0x100, BranchKind::Conditional, 2), (0x200, true));

    bp.update(0x100, 0x200, false, BranchKind::Conditional, 3);
    assert_eq!(bp.predict(0x100, BranchKind::Conditional, 4), (0x200, false));
}

// ══════════════════════════════════════════════════════════
// 2. Returns and call sizing
// ══════════════════════════════════════════════════════════

#[test]
fn return_predicts_call_site_plus_estimated_width() {
    let mut bp = TargetPredictor::new(&tiny_config());
    let _ = bp.predict(0x1000, BranchKind::DirectCall, 1);
    assert_eq!(bp.predict(0x5000, BranchKind::Return, 2), (0x1004, true));
}

#[test]
fn return_resolution_recalibrates_the_call_width() {
    let mut bp = TargetPredictor::new(&tiny_config());
    let _ = bp.predict(0x1000, BranchKind::DirectCall, 1);

    // The return lands 6 bytes past the call site; the estimator learns it.
    bp.update(0x5000, 0x1006, true, BranchKind::Return, 2);

    let _ = bp.predict(0x1000, BranchKind::DirectCall, 3);
    assert_eq!(bp.predict(0x5000, BranchKind::Return, 4), (0x1006, true));
}

#[test]
fn tail_call_distance_is_rejected_but_still_pops() {
    let mut bp = TargetPredictor::new(&tiny_config());
    let _ = bp.predict(0x1000, BranchKind::DirectCall, 1);

    // A resolved target nowhere near the call site: estimator untouched.
    bp.update(0x5000, 0x9000_0000, true, BranchKind::Return, 2);

    let _ = bp.predict(0x1000, BranchKind::DirectCall, 3);
    assert_eq!(
        bp.predict(0x5000, BranchKind::Return, 4),
        (0x1004, true),
        "Estimate stays at the default width"
    );
}

#[test]
fn return_with_empty_stack_predicts_from_address_zero() {
    // Defined behaviour, not an error: the empty stack reads as call site
    // zero, so the prediction is the default width past address zero.
    let mut bp = TargetPredictor::new(&tiny_config());
    assert_eq!(bp.predict(0x5000, BranchKind::Return, 1), (4, true));
}

// ══════════════════════════════════════════════════════════
// 3. Indirect branches
// ══════════════════════════════════════════════════════════

#[test]
fn indirect_round_trip_uses_the_indirect_table() {
    let mut bp = TargetPredictor::new(&tiny_config());
    bp.update(0x40, 0x7000, true, BranchKind::Indirect, 1);
    assert_eq!(bp.predict(0x40, BranchKind::Indirect, 2), (0x7000, true));
}

#[test]
fn indirect_update_does_not_train_the_target_cache() {
    let mut bp = TargetPredictor::new(&tiny_config());
    bp.update(0x40, 0x7000, true, BranchKind::Indirect, 1);
    assert_eq!(
        bp.predict(0x40, BranchKind::Direct, 2),
        (0, true),
        "Same address as a direct jump is still a cache miss"
    );
}

#[test]
fn indirect_call_serves_the_table_and_pushes_the_stack() {
    let mut bp = TargetPredictor::new(&tiny_config());
    bp.update(0x40, 0x7000, true, BranchKind::IndirectCall, 1);

    assert_eq!(bp.predict(0x40, BranchKind::IndirectCall, 2), (0x7000, true));
    assert_eq!(
        bp.predict(0x5000, BranchKind::Return, 3),
        (0x44, true),
        "The indirect call site went on the stack"
    );
}

// ══════════════════════════════════════════════════════════
// 4. History register routing
// ══════════════════════════════════════════════════════════

#[test]
fn only_conditional_outcomes_move_the_history() {
    let mut bp = TargetPredictor::new(&tiny_config());
    bp.update(0x40, 0xAAAA, true, BranchKind::Indirect, 1);
    assert_eq!(bp.predict(0x40, BranchKind::Indirect, 2), (0xAAAA, true));

    // Calls, jumps, and returns resolve without perturbing the hash.
    bp.update(0x200, 0x300, true, BranchKind::DirectCall, 3);
    bp.update(0x204, 0x304, true, BranchKind::Direct, 4);
    let _ = bp.predict(0x300, BranchKind::DirectCall, 5);
    bp.update(0x5000, 0x304, true, BranchKind::Return, 6);
    assert_eq!(bp.predict(0x40, BranchKind::Indirect, 7), (0xAAAA, true));

    // One conditional outcome re-hashes the same address elsewhere.
    bp.update(0x100, 0x200, true, BranchKind::Conditional, 8);
    assert_eq!(bp.predict(0x40, BranchKind::Indirect, 9), (0, true));
}

// ══════════════════════════════════════════════════════════
// 5. Reset
// ══════════════════════════════════════════════════════════

#[test]
fn reset_returns_the_core_to_its_initial_state() {
    let mut bp = TargetPredictor::new(&tiny_config());
    bp.update(0x100, 0x200, true, BranchKind::Direct, 1);
    bp.update(0x40, 0x7000, true, BranchKind::Indirect, 2);
    let _ = bp.predict(0x1000, BranchKind::DirectCall, 3);
    bp.update(0x5000, 0x1006, true, BranchKind::Return, 4);

    bp.reset();

    assert_eq!(bp.predict(0x100, BranchKind::Direct, 5), (0, true));
    assert_eq!(bp.predict(0x40, BranchKind::Indirect, 6), (0, true));
    assert_eq!(
        bp.predict(0x5000, BranchKind::Return, 7),
        (4, true),
        "Empty stack and default width again"
    );
}
