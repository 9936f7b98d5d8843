//! Status codes returned by service entry points.
//!
//! Entry points return `i64`: non-negative values are operation-specific
//! results, negative values are the codes below. The taxonomy is narrow by
//! design — the library has no allocation, parsing, or I/O failure modes.

/// Success with no payload.
pub const SVC_OK: i64 = 0;

/// Null state pointer, unstamped state block, or out-of-range argument.
pub const SVC_ERR_INVAL: i64 = -22;

/// Operation requires the library to be running and it is not.
pub const SVC_ERR_NOT_READY: i64 = -11;

/// Slot is defined in the table but carries no real handler.
pub const SVC_ERR_NOT_SUPPORTED: i64 = -38;

/// True for any error return.
#[inline]
pub const fn is_err(ret: i64) -> bool {
    ret < 0
}
