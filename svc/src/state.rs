//! Checked access to the manager-provided state block.
//!
//! Entry points receive a raw `*mut ServiceState` across the ABI boundary.
//! Every access goes through one of the two helpers here: a null pointer or
//! an unstamped block yields `SVC_ERR_INVAL`, never a stray dereference.

use kexsvc_abi::{SERVICE_STATE_MAGIC, SVC_ERR_INVAL, ServiceState};

/// Borrow a stamped state block.
///
/// Rejects null pointers and blocks that have not been through generic
/// init. This is what every entry point except generic init uses.
#[inline(always)]
pub(crate) fn checked_state<'a>(state: *mut ServiceState) -> Result<&'a mut ServiceState, i64> {
    if state.is_null() {
        return Err(SVC_ERR_INVAL);
    }
    // SAFETY: non-null, and the manager guarantees the pointer addresses a
    // live ServiceState with exclusive access for the duration of the call.
    let st = unsafe { &mut *state };
    if st.magic != SERVICE_STATE_MAGIC {
        return Err(SVC_ERR_INVAL);
    }
    Ok(st)
}

/// Borrow a state block without the magic check. Only generic init uses
/// this — it is the operation that stamps the magic in the first place.
#[inline(always)]
pub(crate) fn raw_state<'a>(state: *mut ServiceState) -> Result<&'a mut ServiceState, i64> {
    if state.is_null() {
        return Err(SVC_ERR_INVAL);
    }
    // SAFETY: as in checked_state; the magic is not yet required to be set.
    Ok(unsafe { &mut *state })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;

    #[test]
    fn test_null_rejected() {
        assert_eq!(checked_state(ptr::null_mut()).err(), Some(SVC_ERR_INVAL));
        assert_eq!(raw_state(ptr::null_mut()).err(), Some(SVC_ERR_INVAL));
    }

    #[test]
    fn test_unstamped_rejected() {
        let mut st = ServiceState::new();
        assert_eq!(checked_state(&mut st).err(), Some(SVC_ERR_INVAL));
        // raw_state accepts the same block.
        assert!(raw_state(&mut st).is_ok());
    }

    #[test]
    fn test_stamped_accepted() {
        let mut st = ServiceState::new();
        st.magic = SERVICE_STATE_MAGIC;
        assert!(checked_state(&mut st).is_ok());
    }
}
