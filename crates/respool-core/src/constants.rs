//! Default sizes, timing constants, and process exit codes.

use std::time::Duration;

/// Default number of resources created when a pool is built.
pub const DEFAULT_INITIAL: usize = 16;

/// Default hard ceiling on resident resources.
pub const DEFAULT_MAX_CAPACITY: usize = 64;

/// Longest a blocked acquire sleeps before re-checking its cancellation token.
pub const WAIT_SLICE: Duration = Duration::from_millis(10);

/// Process exit codes used by the `respool` binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A blocking acquire timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Pool accounting invariants were violated during a run.
    pub const ERROR_INVARIANT: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
