//! Error handling and exit codes.

use respool_core::constants::exit_codes;
use respool_core::PoolError;
use respool_sim::SimError;

/// Exit code for a pool error.
pub fn pool_exit_code(err: &PoolError) -> i32 {
    match err {
        PoolError::InvalidConfiguration(_) => exit_codes::ERROR_CONFIG,
        PoolError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        PoolError::Cancelled => exit_codes::ERROR_CANCELED,
        PoolError::PoolExhausted { .. } | PoolError::InvalidResource | PoolError::Hook(_) => {
            exit_codes::ERROR_GENERIC
        }
    }
}

/// Handle a simulation error and return the appropriate exit code.
pub fn handle_error(err: &SimError) -> i32 {
    match err {
        SimError::Pool(e) => pool_exit_code(e),
        SimError::Config(_) | SimError::Io(_) | SimError::Json(_) => exit_codes::ERROR_CONFIG,
        SimError::InvariantViolation(_) => exit_codes::ERROR_INVARIANT,
    }
}

/// Exit code for an application error, looking through `anyhow` context.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let code = if let Some(e) = err.downcast_ref::<SimError>() {
        handle_error(e)
    } else if let Some(e) = err.downcast_ref::<PoolError>() {
        pool_exit_code(e)
    } else {
        exit_codes::ERROR_GENERIC
    };
    u8::try_from(code).unwrap_or(1)
}
