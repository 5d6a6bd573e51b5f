//! # Value Objects
//!
//! Configuration for the account service.

/// Balance granted to an account on first session establishment.
pub const DEFAULT_QUOTA: u64 = 500;

/// Optimistic-concurrency retries before surfacing `Conflict`.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 5;

/// Account service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    /// Retries of the read-modify-write cycle after a version mismatch.
    /// The cycle runs at most `max_conflict_retries + 1` times.
    pub max_conflict_retries: u32,
    /// Starting balance for newly created accounts.
    pub default_quota: u64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            default_quota: DEFAULT_QUOTA,
        }
    }
}
