//! Logging into the shared-state byte ring.
//!
//! All library log output funnels into the ring inside [`ServiceState`];
//! the manager drains it from its side with [`drain`]. The library never
//! calls a kernel print routine — after a kexec handoff there is nothing
//! guaranteed to be there to call.
//!
//! # Record format
//!
//! One record per event: `<tag> <msg> <hex value>\n`, where `<tag>` is the
//! single-letter level. The ring overwrites oldest data when full, so the
//! manager can always read the most recent records.
//!
//! The write path is `#[inline(always)]` so its code is emitted inside the
//! section-pinned entry wrappers; [`drain`] runs on the manager side and is
//! not part of the relocated region.

use kexsvc_abi::{LOG_LEVEL_DEBUG, LOG_LEVEL_ERROR, LOG_LEVEL_INFO, LOG_LEVEL_WARN, LOG_RING_SIZE};
use kexsvc_abi::ServiceState;

use crate::numfmt;

const RING_MASK: u32 = (LOG_RING_SIZE - 1) as u32;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SvcLogLevel {
    Error = LOG_LEVEL_ERROR,
    Warn = LOG_LEVEL_WARN,
    Info = LOG_LEVEL_INFO,
    Debug = LOG_LEVEL_DEBUG,
}

impl SvcLogLevel {
    #[inline(always)]
    fn tag(self) -> u8 {
        match self {
            SvcLogLevel::Error => b'E',
            SvcLogLevel::Warn => b'W',
            SvcLogLevel::Info => b'I',
            SvcLogLevel::Debug => b'D',
        }
    }
}

#[inline(always)]
fn is_enabled(state: &ServiceState, level: SvcLogLevel) -> bool {
    level as u8 <= state.log_level
}

#[inline(always)]
fn push_byte(state: &mut ServiceState, byte: u8) {
    // Full ring: drop the oldest byte.
    if state.log_head.wrapping_sub(state.log_tail) >= LOG_RING_SIZE as u32 {
        state.log_tail = state.log_tail.wrapping_add(1);
    }
    state.log_buf[(state.log_head & RING_MASK) as usize] = byte;
    state.log_head = state.log_head.wrapping_add(1);
}

#[inline(always)]
fn push_bytes(state: &mut ServiceState, bytes: &[u8]) {
    let mut i = 0;
    while i < bytes.len() {
        push_byte(state, bytes[i]);
        i += 1;
    }
}

/// Emit one record into the state's log ring, subject to the state's level
/// threshold.
#[inline(always)]
pub fn log_event(state: &mut ServiceState, level: SvcLogLevel, msg: &[u8], value: u64) {
    if !is_enabled(state, level) {
        return;
    }
    push_byte(state, level.tag());
    push_byte(state, b' ');
    push_bytes(state, msg);
    push_byte(state, b' ');
    let mut buf = [0u8; numfmt::HEX_BUF_LEN];
    let text = numfmt::fmt_hex_u64(value, &mut buf);
    push_bytes(state, text);
    push_byte(state, b'\n');
}

/// Manager side: copy up to `out.len()` buffered bytes out of the ring.
/// Returns the number of bytes copied.
pub fn drain(state: &mut ServiceState, out: &mut [u8]) -> usize {
    let mut copied = 0;
    while copied < out.len() && state.log_tail != state.log_head {
        out[copied] = state.log_buf[(state.log_tail & RING_MASK) as usize];
        state.log_tail = state.log_tail.wrapping_add(1);
        copied += 1;
    }
    copied
}

/// Bytes currently buffered in the ring.
pub fn buffered(state: &ServiceState) -> usize {
    state.log_head.wrapping_sub(state.log_tail) as usize
}
