//! Entry-point table layout and operation identifiers (manager-library ABI).
//!
//! This module is the **single source of truth** for the slot numbering of
//! the entry-point table. Both the manager and the library import from here.
//!
//! # Adding New Operations
//!
//! 1. Add the variant with the next free slot number
//! 2. Bump [`ServiceOp::COUNT`]
//! 3. Wire the slot in the library's table construction
//! 4. Bump [`EXPECTED_MGR_VERSION`] **only** if the table's shape or the
//!    meaning of an existing slot changes — new slots taken from the
//!    reserved range do not require a bump
//!
//! Slot numbers are a binary contract with deployed managers and must never
//! be reused for a different operation.

use crate::state::ServiceState;

/// Table-layout revision the manager is expected to understand.
///
/// The manager compares this against its own constant and must refuse the
/// table (or restrict itself to a compatible subset of slots) on mismatch.
/// The library never enforces this on its own.
pub const EXPECTED_MGR_VERSION: u32 = 3;

/// Total number of slots in the table. Slots beyond the defined operations
/// are reserved for future use and hold the undefined-operation handler.
pub const NUM_ENTRY_POINTS: usize = 16;

/// Operations the manager can request from the service library.
///
/// The discriminant is the slot index into
/// [`EntryPointTable::entry_point`]. The hardware semantics behind each
/// operation belong to the library; only the numbering is defined here.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceOp {
    /// Bring the library up in interrupt-driven mode.
    InitIntr = 0,
    /// Bring the library up in polled mode.
    InitPoll = 1,
    /// Shut the library down.
    Shut = 2,
    /// Service pending work (polled mode).
    Poll = 3,
    /// Query the address where secondary CPUs park across a kexec handoff.
    GetHoldingPen = 4,
    /// Indirect-interrupt service routine.
    IndirectIntr = 5,
    /// Notify-interrupt service routine.
    NotifyIntr = 6,
    /// Generic one-time initialization of the shared state block.
    InitFn = 7,
    /// Read a command register.
    CmdRead = 8,
    /// Write a command register.
    CmdWrite = 9,
    /// Query the library revision.
    GetVersion = 10,
}

impl ServiceOp {
    /// Number of defined operations; the remaining slots up to
    /// [`NUM_ENTRY_POINTS`] are reserved.
    pub const COUNT: usize = 11;

    /// Slot index of this operation.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The single calling convention shared by every entry point.
///
/// `state` is the manager-owned [`ServiceState`] block; the meaning of
/// `arg0`/`arg1` is operation-specific. Non-negative returns are
/// operation-specific success values, negative returns are status codes
/// from [`crate::error`].
pub type EntryFn = extern "C" fn(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64;

/// The versioned entry-point table published by the service library.
///
/// Field order is ABI. There is exactly one live instance per image; it is
/// constructed once and read-only thereafter. Every slot is populated —
/// reserved or unsupported operations map to the undefined-operation
/// handler, never to a null entry. Slot lookup is plain indexing: the
/// table is a trusted internal ABI, and range validation is the caller's
/// responsibility.
#[repr(C)]
pub struct EntryPointTable {
    /// Must equal [`EXPECTED_MGR_VERSION`] as understood by the caller.
    pub expected_mgr_version: u32,
    /// Library revision, independent of the table-layout version.
    pub lib_version_major: u32,
    pub lib_version_minor: u32,
    /// Bounds of the library's executable code, `[code_start, code_end)`.
    /// Every address reachable through `entry_point` lies inside.
    pub code_start: usize,
    pub code_end: usize,
    /// Slot array indexed by [`ServiceOp`] discriminants.
    pub entry_point: [EntryFn; NUM_ENTRY_POINTS],
}

impl EntryPointTable {
    /// Convenience lookup for a defined operation.
    #[inline]
    pub fn entry(&self, op: ServiceOp) -> EntryFn {
        self.entry_point[op.index()]
    }
}

/// Encoding of the `GetVersion` return value: `major << 16 | minor`.
pub const fn version_word(major: u32, minor: u32) -> i64 {
    (((major as u64) << 16) | (minor as u64 & 0xffff)) as i64
}
