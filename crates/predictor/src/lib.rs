//! Branch target prediction engine for cycle-accurate CPU simulators.
//!
//! This crate implements the target side of branch prediction: given the
//! address and kind of a control-flow instruction at fetch, it produces the
//! most likely next instruction address before the instruction has executed.
//! It provides:
//! 1. **Target cache:** set-associative, LRU-evicted storage for direct,
//!    direct-call, and conditional branch targets.
//! 2. **Indirect table:** history-hashed, tagless target storage for
//!    indirect jumps and indirect calls.
//! 3. **Return address stack:** circular stack of call sites, paired with an
//!    adaptive call-size estimator that converts them into return targets.
//! 4. **Dispatch:** a per-core [`TargetPredictor`] with `predict`/`update`
//!    entry points driven from the host pipeline's fetch and retire stages.
//! 5. **Configuration:** serde-deserializable geometry with validation.
//!
//! Direction prediction (taken vs. not-taken) is out of scope; the
//! `always_taken` flag returned by [`TargetPredictor::predict`] tells the
//! host when it can bypass its direction predictor.

/// Branch kind classification supplied by the host pipeline.
pub mod branch;
/// Predictor configuration (defaults, geometry, validation).
pub mod config;
/// Per-core prediction engine and its storage units.
pub mod core;

/// Branch kind supplied on every `predict`/`update` call.
pub use crate::branch::BranchKind;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Per-core prediction engine; one owned instance per simulated core.
pub use crate::core::TargetPredictor;
