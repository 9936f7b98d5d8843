//! Entry-point bodies.
//!
//! The hardware-facing work behind these operations is the manager's and
//! the device's business; what lives here is the interface glue that keeps
//! the shared state block coherent. Every body is `#[inline(always)]` and
//! is called from exactly one section-pinned wrapper in `entry`, so the
//! emitted code lands inside `[code_start, code_end)`.
//!
//! All bodies share the table's calling convention: `(state, arg0, arg1)`
//! in, `i64` status out.

use kexsvc_abi::{
    CMD_REG_COUNT, SERVICE_STATE_MAGIC, SVC_ERR_INVAL, SVC_ERR_NOT_READY, SVC_ERR_NOT_SUPPORTED,
    SVC_OK, ServiceFlags, ServiceState, version_word,
};

use crate::state::{checked_state, raw_state};
use crate::svclog::{self, SvcLogLevel};
use crate::{LIB_VERSION_MAJOR, LIB_VERSION_MINOR};

#[inline(always)]
fn start_mode(state: *mut ServiceState, mode: ServiceFlags, msg: &[u8]) -> i64 {
    let st = match checked_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    st.clear_flag(ServiceFlags::INTR_MODE | ServiceFlags::POLL_MODE);
    st.set_flag(ServiceFlags::RUNNING | mode);
    let flags = st.flags as u64;
    svclog::log_event(st, SvcLogLevel::Info, msg, flags);
    SVC_OK
}

/// `ServiceOp::InitIntr` — come up in interrupt-driven mode.
#[inline(always)]
pub(crate) fn init_intr(state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    start_mode(state, ServiceFlags::INTR_MODE, b"init intr")
}

/// `ServiceOp::InitPoll` — come up in polled mode.
#[inline(always)]
pub(crate) fn init_poll(state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    start_mode(state, ServiceFlags::POLL_MODE, b"init poll")
}

/// `ServiceOp::Shut` — stop accepting work.
#[inline(always)]
pub(crate) fn shut(state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    let st = match checked_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    st.clear_flag(ServiceFlags::RUNNING | ServiceFlags::INTR_MODE | ServiceFlags::POLL_MODE);
    let polls = st.poll_count;
    svclog::log_event(st, SvcLogLevel::Info, b"shut", polls);
    SVC_OK
}

/// `ServiceOp::Poll` — one polled-mode service pass.
#[inline(always)]
pub(crate) fn poll(state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    let st = match checked_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    if !st.flag_bits().contains(ServiceFlags::RUNNING) {
        return SVC_ERR_NOT_READY;
    }
    st.poll_count = st.poll_count.wrapping_add(1);
    SVC_OK
}

/// `ServiceOp::IndirectIntr` — indirect-interrupt service routine.
/// Returns the running invocation count.
#[inline(always)]
pub(crate) fn ind_intr(state: *mut ServiceState, vector: u64, _arg1: u64) -> i64 {
    let st = match checked_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    st.ind_intr_count = st.ind_intr_count.wrapping_add(1);
    svclog::log_event(st, SvcLogLevel::Debug, b"ind intr", vector);
    st.ind_intr_count as i64
}

/// `ServiceOp::NotifyIntr` — notify-interrupt service routine.
/// Returns the running invocation count.
#[inline(always)]
pub(crate) fn not_intr(state: *mut ServiceState, vector: u64, _arg1: u64) -> i64 {
    let st = match checked_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    st.not_intr_count = st.not_intr_count.wrapping_add(1);
    svclog::log_event(st, SvcLogLevel::Debug, b"not intr", vector);
    st.not_intr_count as i64
}

/// `ServiceOp::GetHoldingPen` — address where secondary CPUs park across
/// the kexec handoff. The pen routine itself lives in `entry` so it sits
/// between the code-region markers.
#[inline(always)]
pub(crate) fn get_holding_pen(state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    if let Err(err) = checked_state(state) {
        return err;
    }
    crate::entry::kexsvc_holding_pen as *const () as usize as i64
}

/// `ServiceOp::InitFn` — generic one-time initialization. Stamps the magic
/// and resets everything except the log ring, which may already hold
/// records the manager has not drained.
#[inline(always)]
pub(crate) fn init_fn(state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    let st = match raw_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    st.magic = SERVICE_STATE_MAGIC;
    st.flags = 0;
    st.poll_count = 0;
    st.ind_intr_count = 0;
    st.not_intr_count = 0;
    st.cmd_regs = [0; CMD_REG_COUNT];
    if st.log_level > kexsvc_abi::LOG_LEVEL_DEBUG {
        st.log_level = kexsvc_abi::LOG_LEVEL_INFO;
    }
    svclog::log_event(st, SvcLogLevel::Info, b"init", SERVICE_STATE_MAGIC as u64);
    SVC_OK
}

/// `ServiceOp::CmdRead` — read command register `arg0`.
#[inline(always)]
pub(crate) fn cmd_read(state: *mut ServiceState, reg: u64, _arg1: u64) -> i64 {
    let st = match checked_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    if reg >= CMD_REG_COUNT as u64 {
        return SVC_ERR_INVAL;
    }
    // Register values are confined to 63 bits by the write side.
    st.cmd_regs[reg as usize] as i64
}

/// `ServiceOp::CmdWrite` — write `arg1` to command register `arg0`.
#[inline(always)]
pub(crate) fn cmd_write(state: *mut ServiceState, reg: u64, value: u64) -> i64 {
    let st = match checked_state(state) {
        Ok(st) => st,
        Err(err) => return err,
    };
    if reg >= CMD_REG_COUNT as u64 || value > i64::MAX as u64 {
        return SVC_ERR_INVAL;
    }
    st.cmd_regs[reg as usize] = value;
    svclog::log_event(st, SvcLogLevel::Debug, b"cmd write", value);
    SVC_OK
}

/// `ServiceOp::GetVersion` — library revision as `major << 16 | minor`.
/// Usable before generic init; touches nothing.
#[inline(always)]
pub(crate) fn get_version(_state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    version_word(LIB_VERSION_MAJOR, LIB_VERSION_MINOR)
}

/// Handler for reserved and unsupported slots. Touches nothing.
#[inline(always)]
pub(crate) fn undefined(_state: *mut ServiceState, _arg0: u64, _arg1: u64) -> i64 {
    SVC_ERR_NOT_SUPPORTED
}
