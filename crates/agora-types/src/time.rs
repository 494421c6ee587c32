//! Time is represented as unix-epoch seconds supplied by the host. The engine
//! never reads a clock itself.

/// Unix timestamp in seconds.
pub type Timestamp = u64;

pub const SECS_PER_DAY: u64 = 86_400;

/// Whole days expressed in seconds, for policy constants.
pub const fn days(n: u64) -> u64 {
    n * SECS_PER_DAY
}
