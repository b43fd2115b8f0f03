//! Configuration for the target prediction engine.
//!
//! This module defines the geometry of every storage structure. It provides:
//! 1. **Defaults:** the reference sizing (1024-set x 8-way target cache,
//!    4096-entry indirect table, 64-slot RAS, 1024 call-size trackers).
//! 2. **Structures:** one config struct per storage unit under a single root.
//! 3. **Validation:** geometry checks performed once when configuration is
//!    ingested; the prediction hot path itself has no recoverable errors.
//!
//! Configuration is supplied as JSON from the host (deserialized with serde)
//! or via `Config::default()`.

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants for the prediction engine.
///
/// These values define the reference sizing used when a field is not
/// explicitly overridden in the host-supplied configuration.
mod defaults {
    /// Number of sets in the target cache.
    pub const TARGET_SETS: usize = 1024;

    /// Target cache associativity (entries scanned per lookup).
    pub const TARGET_WAYS: usize = 8;

    /// Entries in the history-hashed indirect target table.
    pub const INDIRECT_SIZE: usize = 4096;

    /// Slots in the return address stack ring.
    pub const RAS_CAPACITY: usize = 64;

    /// Slots in the call-size estimator table.
    pub const CALL_SIZE_TRACKERS: usize = 1024;

    /// Initial byte-width estimate for call instructions.
    ///
    /// Every estimator slot starts here and converges toward the true
    /// length of the call instructions hashing to it.
    pub const CALL_INSTR_WIDTH: u64 = 4;
}

/// Errors detected while validating predictor geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A table dimension was configured as zero.
    #[error("{0} must be non-zero")]
    ZeroSize(&'static str),

    /// The indirect table size must be a power of two; the conditional
    /// history register is `log2(size)` bits wide.
    #[error("indirect table size must be a power of two, got {0}")]
    IndirectSizeNotPowerOfTwo(usize),
}

/// Root configuration structure for one predictor instance.
///
/// Every section and field is optional in the serialized form; omitted
/// fields take the reference sizing.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use btbsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.targets.sets, 1024);
/// assert_eq!(config.ras.capacity, 64);
/// ```
///
/// Deserializing from JSON (typical host usage):
///
/// ```
/// use btbsim_core::config::Config;
///
/// let json = r#"{
///     "targets": { "sets": 512, "ways": 4 },
///     "indirect": { "size": 2048 },
///     "ras": { "capacity": 32 },
///     "call_size": { "trackers": 512, "default_width": 4 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.targets.ways, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Target cache geometry
    #[serde(default)]
    pub targets: TargetCacheConfig,

    /// Indirect target table geometry
    #[serde(default)]
    pub indirect: IndirectTableConfig,

    /// Return address stack geometry
    #[serde(default)]
    pub ras: RasConfig,

    /// Call-size estimator geometry
    #[serde(default)]
    pub call_size: CallSizeConfig,
}

impl Config {
    /// Checks that the configured geometry can actually be built.
    ///
    /// Call this once when ingesting host-supplied configuration;
    /// [`crate::TargetPredictor::new`] asserts the same invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroSize`] for any zero dimension and
    /// [`ConfigError::IndirectSizeNotPowerOfTwo`] when the indirect table
    /// size has no integral `log2`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.sets == 0 {
            return Err(ConfigError::ZeroSize("target cache sets"));
        }
        if self.targets.ways == 0 {
            return Err(ConfigError::ZeroSize("target cache ways"));
        }
        if self.indirect.size == 0 {
            return Err(ConfigError::ZeroSize("indirect table size"));
        }
        if !self.indirect.size.is_power_of_two() {
            return Err(ConfigError::IndirectSizeNotPowerOfTwo(self.indirect.size));
        }
        if self.ras.capacity == 0 {
            return Err(ConfigError::ZeroSize("RAS capacity"));
        }
        if self.call_size.trackers == 0 {
            return Err(ConfigError::ZeroSize("call size trackers"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: TargetCacheConfig::default(),
            indirect: IndirectTableConfig::default(),
            ras: RasConfig::default(),
            call_size: CallSizeConfig::default(),
        }
    }
}

/// Set-associative target cache geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetCacheConfig {
    /// Number of sets
    #[serde(default = "TargetCacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (ways per set)
    #[serde(default = "TargetCacheConfig::default_ways")]
    pub ways: usize,
}

impl TargetCacheConfig {
    /// Returns the default number of target cache sets.
    fn default_sets() -> usize {
        defaults::TARGET_SETS
    }

    /// Returns the default target cache associativity.
    fn default_ways() -> usize {
        defaults::TARGET_WAYS
    }
}

impl Default for TargetCacheConfig {
    fn default() -> Self {
        Self {
            sets: defaults::TARGET_SETS,
            ways: defaults::TARGET_WAYS,
        }
    }
}

/// Indirect target table geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct IndirectTableConfig {
    /// Number of target slots; must be a power of two
    #[serde(default = "IndirectTableConfig::default_size")]
    pub size: usize,
}

impl IndirectTableConfig {
    /// Returns the default indirect table size.
    fn default_size() -> usize {
        defaults::INDIRECT_SIZE
    }
}

impl Default for IndirectTableConfig {
    fn default() -> Self {
        Self {
            size: defaults::INDIRECT_SIZE,
        }
    }
}

/// Return address stack geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct RasConfig {
    /// Ring capacity in call-site slots
    #[serde(default = "RasConfig::default_capacity")]
    pub capacity: usize,
}

impl RasConfig {
    /// Returns the default return address stack capacity.
    fn default_capacity() -> usize {
        defaults::RAS_CAPACITY
    }
}

impl Default for RasConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::RAS_CAPACITY,
        }
    }
}

/// Call-size estimator geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct CallSizeConfig {
    /// Number of per-address estimate slots
    #[serde(default = "CallSizeConfig::default_trackers")]
    pub trackers: usize,

    /// Byte width every slot starts from
    #[serde(default = "CallSizeConfig::default_width")]
    pub default_width: u64,
}

impl CallSizeConfig {
    /// Returns the default call-size tracker count.
    fn default_trackers() -> usize {
        defaults::CALL_SIZE_TRACKERS
    }

    /// Returns the default initial call instruction width.
    fn default_width() -> u64 {
        defaults::CALL_INSTR_WIDTH
    }
}

impl Default for CallSizeConfig {
    fn default() -> Self {
        Self {
            trackers: defaults::CALL_SIZE_TRACKERS,
            default_width: defaults::CALL_INSTR_WIDTH,
        }
    }
}
