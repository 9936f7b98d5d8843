//! Shared state block passed to every entry point.
//!
//! The manager owns one [`ServiceState`] per device and hands its address to
//! every call through the table. All mutable state the library touches lives
//! in this block — the library itself allocates nothing, so the whole
//! arrangement survives a kexec handoff together with the relocated code.
//!
//! The manager serializes entry-point invocations per state block; the
//! library assumes exclusive access for the duration of a call.

use bitflags::bitflags;

/// Value stamped into [`ServiceState::magic`] by the generic-init entry
/// point. Entry points other than generic init reject unstamped blocks.
pub const SERVICE_STATE_MAGIC: u32 = 0x6b78_7376; // "kxsv"

/// Number of command registers reachable through the command entry points.
pub const CMD_REG_COUNT: usize = 4;

/// Capacity of the in-state log ring. Power of two.
pub const LOG_RING_SIZE: usize = 1024;

/// Log levels for [`ServiceState::log_level`].
pub const LOG_LEVEL_ERROR: u8 = 0;
pub const LOG_LEVEL_WARN: u8 = 1;
pub const LOG_LEVEL_INFO: u8 = 2;
pub const LOG_LEVEL_DEBUG: u8 = 3;

bitflags! {
    /// Interpretation of the raw [`ServiceState::flags`] word.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ServiceFlags: u32 {
        /// Library is up and accepting work.
        const RUNNING = 1 << 0;
        /// Interrupt-driven mode selected.
        const INTR_MODE = 1 << 1;
        /// Polled mode selected.
        const POLL_MODE = 1 << 2;
        /// Releases CPUs parked in the holding pen.
        const PEN_RELEASE = 1 << 3;
    }
}

/// Manager-owned shared memory block.
///
/// Field order is ABI. The flags word is stored raw so the layout stays a
/// plain integer on the wire; use [`ServiceState::flag_bits`] and the
/// set/clear helpers for typed access.
#[repr(C)]
pub struct ServiceState {
    /// [`SERVICE_STATE_MAGIC`] once the block has been through generic init.
    pub magic: u32,
    /// Raw [`ServiceFlags`] word.
    pub flags: u32,
    /// Log threshold, one of the `LOG_LEVEL_*` constants.
    pub log_level: u8,
    pub _reserved: [u8; 7],
    /// Completed polled-mode service passes.
    pub poll_count: u64,
    /// Indirect-interrupt invocations.
    pub ind_intr_count: u64,
    /// Notify-interrupt invocations.
    pub not_intr_count: u64,
    /// Command register file for the command entry points.
    pub cmd_regs: [u64; CMD_REG_COUNT],
    /// Log ring write/read cursors (free-running, masked on access).
    pub log_head: u32,
    pub log_tail: u32,
    /// Log ring storage, drained by the manager.
    pub log_buf: [u8; LOG_RING_SIZE],
}

impl ServiceState {
    /// A fresh, unstamped block. The manager zeroes or constructs one of
    /// these and then runs the generic-init entry point against it.
    pub const fn new() -> Self {
        Self {
            magic: 0,
            flags: 0,
            log_level: LOG_LEVEL_INFO,
            _reserved: [0; 7],
            poll_count: 0,
            ind_intr_count: 0,
            not_intr_count: 0,
            cmd_regs: [0; CMD_REG_COUNT],
            log_head: 0,
            log_tail: 0,
            log_buf: [0; LOG_RING_SIZE],
        }
    }

    /// Typed view of the flags word.
    #[inline]
    pub fn flag_bits(&self) -> ServiceFlags {
        ServiceFlags::from_bits_truncate(self.flags)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: ServiceFlags) {
        self.flags |= flag.bits();
    }

    #[inline]
    pub fn clear_flag(&mut self, flag: ServiceFlags) {
        self.flags &= !flag.bits();
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_is_unstamped() {
        let st = ServiceState::new();
        assert_eq!(st.magic, 0);
        assert_eq!(st.flags, 0);
        assert_eq!(st.log_level, LOG_LEVEL_INFO);
        assert_eq!(st.log_head, 0);
        assert_eq!(st.log_tail, 0);
    }

    #[test]
    fn test_flag_helpers() {
        let mut st = ServiceState::new();
        st.set_flag(ServiceFlags::RUNNING | ServiceFlags::INTR_MODE);
        assert!(st.flag_bits().contains(ServiceFlags::RUNNING));
        assert!(st.flag_bits().contains(ServiceFlags::INTR_MODE));
        st.clear_flag(ServiceFlags::INTR_MODE);
        assert!(st.flag_bits().contains(ServiceFlags::RUNNING));
        assert!(!st.flag_bits().contains(ServiceFlags::INTR_MODE));
    }

    #[test]
    fn test_ring_size_is_power_of_two() {
        assert!(LOG_RING_SIZE.is_power_of_two());
    }
}
