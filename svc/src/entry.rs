//! Code-region markers, entry wrappers, and the table publisher.
//!
//! Everything the manager can reach through the table lives in the
//! dedicated `.text.kexsvc` section: the start marker first, then the entry
//! wrappers and the holding pen, then the end marker. A linker never
//! reorders bytes within one output section, so `[code_start, code_end)`
//! bounds every published function in the final image no matter how input
//! sections are arranged. Definition order below matches the unit ordering
//! contract in `lib.rs`, and the exported symbol names sort the same way
//! (`kexsvc_aa_*` < `kexsvc_ep_*` < `kexsvc_zz_*`).
//!
//! Marker containment is a build-time contract, not a runtime check; the
//! post-link test in `tests/code_region.rs` verifies it against the linked
//! image.

use kexsvc_abi::{
    EXPECTED_MGR_VERSION, EntryFn, EntryPointTable, NUM_ENTRY_POINTS, ServiceFlags, ServiceOp,
    ServiceState,
};
use spin::Once;

use crate::handlers;
use crate::{LIB_VERSION_MAJOR, LIB_VERSION_MINOR};

/// Start-of-code marker. The body is an opaque no-op so each marker gets
/// distinct code and cannot be folded into the other.
#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
#[inline(never)]
pub extern "C" fn kexsvc_aa_code_start() {
    core::hint::black_box(0u64);
}

// ---------------------------------------------------------------------------
// Entry wrappers — one per table slot, bodies inlined from `handlers`.
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_init_intr(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::init_intr(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_init_poll(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::init_poll(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_shut(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::shut(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_poll(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::poll(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_get_holding_pen(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::get_holding_pen(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_ind_intr(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::ind_intr(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_not_intr(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::not_intr(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_init_fn(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::init_fn(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_cmd_read(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::cmd_read(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_cmd_write(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::cmd_write(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_get_version(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::get_version(state, arg0, arg1)
}

#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_ep_undefined(state: *mut ServiceState, arg0: u64, arg1: u64) -> i64 {
    handlers::undefined(state, arg0, arg1)
}

/// Park loop for secondary CPUs across the kexec handoff. Spins on the
/// state's flags word until the manager sets `PEN_RELEASE`.
#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
#[inline(never)]
pub extern "C" fn kexsvc_holding_pen(state: *mut ServiceState) {
    if state.is_null() {
        return;
    }
    loop {
        // SAFETY: non-null; the flags word is written by the manager while
        // CPUs sit here, so it must be re-read from memory each pass.
        let flags = unsafe { core::ptr::addr_of!((*state).flags).read_volatile() };
        if ServiceFlags::from_bits_truncate(flags).contains(ServiceFlags::PEN_RELEASE) {
            return;
        }
        core::hint::spin_loop();
    }
}

// ---------------------------------------------------------------------------
// Table publisher
// ---------------------------------------------------------------------------

static ENTRY_POINTS: Once<EntryPointTable> = Once::new();

fn build_table() -> EntryPointTable {
    // Populated by executable code rather than a static initializer so
    // every slot is written with PC-relative address material. Reserved
    // slots keep the undefined handler.
    let mut entry_point: [EntryFn; NUM_ENTRY_POINTS] =
        [kexsvc_ep_undefined as EntryFn; NUM_ENTRY_POINTS];
    entry_point[ServiceOp::InitIntr.index()] = kexsvc_ep_init_intr;
    entry_point[ServiceOp::InitPoll.index()] = kexsvc_ep_init_poll;
    entry_point[ServiceOp::Shut.index()] = kexsvc_ep_shut;
    entry_point[ServiceOp::Poll.index()] = kexsvc_ep_poll;
    entry_point[ServiceOp::GetHoldingPen.index()] = kexsvc_ep_get_holding_pen;
    entry_point[ServiceOp::IndirectIntr.index()] = kexsvc_ep_ind_intr;
    entry_point[ServiceOp::NotifyIntr.index()] = kexsvc_ep_not_intr;
    entry_point[ServiceOp::InitFn.index()] = kexsvc_ep_init_fn;
    entry_point[ServiceOp::CmdRead.index()] = kexsvc_ep_cmd_read;
    entry_point[ServiceOp::CmdWrite.index()] = kexsvc_ep_cmd_write;
    entry_point[ServiceOp::GetVersion.index()] = kexsvc_ep_get_version;

    EntryPointTable {
        expected_mgr_version: EXPECTED_MGR_VERSION,
        lib_version_major: LIB_VERSION_MAJOR,
        lib_version_minor: LIB_VERSION_MINOR,
        code_start: kexsvc_aa_code_start as *const () as usize,
        code_end: kexsvc_zz_code_end as *const () as usize,
        entry_point,
    }
}

/// The single table instance. First call constructs it; construction cannot
/// fail and racing callers wait for the one populate step to finish.
pub fn entry_points() -> &'static EntryPointTable {
    ENTRY_POINTS.call_once(build_table)
}

/// ABI accessor the manager resolves once at load time. All further
/// interaction goes through the returned table.
#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
pub extern "C" fn kexsvc_get_entry_points() -> *const EntryPointTable {
    entry_points()
}

/// Marker addresses as a half-open `(start, end)` range.
pub fn code_region() -> (usize, usize) {
    (
        kexsvc_aa_code_start as *const () as usize,
        kexsvc_zz_code_end as *const () as usize,
    )
}

/// End-of-code marker. See the start marker for why the body is not empty.
#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.kexsvc")]
#[inline(never)]
pub extern "C" fn kexsvc_zz_code_end() {
    core::hint::black_box(u64::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kexsvc_abi::{SVC_ERR_NOT_SUPPORTED, SVC_OK, version_word};

    #[test]
    fn test_publisher_is_idempotent() {
        let a = entry_points();
        let b = entry_points();
        assert!(core::ptr::eq(a, b));
        assert_eq!(kexsvc_get_entry_points(), a as *const EntryPointTable);
    }

    #[test]
    fn test_table_metadata() {
        let table = entry_points();
        assert_eq!(table.expected_mgr_version, EXPECTED_MGR_VERSION);
        assert_eq!(table.lib_version_major, LIB_VERSION_MAJOR);
        assert_eq!(table.lib_version_minor, LIB_VERSION_MINOR);
        assert!(table.code_start < table.code_end);
    }

    // Literal pins: the table must reflect this build's declared revision
    // exactly. Update these together with the constants.
    #[test]
    fn test_version_literals() {
        let table = entry_points();
        assert_eq!(table.expected_mgr_version, 3);
        assert_eq!(table.lib_version_major, 3);
        assert_eq!(table.lib_version_minor, 1);
    }

    #[test]
    fn test_every_slot_populated() {
        let table = entry_points();
        let undefined_addr = kexsvc_ep_undefined as *const () as usize;
        for (slot, &entry) in table.entry_point.iter().enumerate() {
            let addr = entry as usize;
            assert_ne!(addr, 0, "slot {slot} is null");
            if slot < ServiceOp::COUNT {
                assert_ne!(addr, undefined_addr, "defined slot {slot} left undefined");
            } else {
                assert_eq!(addr, undefined_addr, "reserved slot {slot} not undefined");
            }
        }
    }

    #[test]
    fn test_reserved_slot_reports_not_supported() {
        let table = entry_points();
        let mut st = ServiceState::new();
        assert_eq!(table.entry(ServiceOp::InitFn)(&mut st, 0, 0), SVC_OK);
        let reserved = table.entry_point[ServiceOp::COUNT];
        assert_eq!(reserved(&mut st, 0, 0), SVC_ERR_NOT_SUPPORTED);
        // The real slots still behave as themselves.
        assert_eq!(
            table.entry(ServiceOp::GetVersion)(&mut st, 0, 0),
            version_word(LIB_VERSION_MAJOR, LIB_VERSION_MINOR)
        );
    }

    #[test]
    fn test_holding_pen_release() {
        let mut st = ServiceState::new();
        let table = entry_points();
        assert_eq!(table.entry(ServiceOp::InitFn)(&mut st, 0, 0), SVC_OK);
        let pen = table.entry(ServiceOp::GetHoldingPen)(&mut st, 0, 0);
        assert_eq!(pen as usize, kexsvc_holding_pen as *const () as usize);
        // Released pen returns immediately; a null state is ignored.
        st.set_flag(ServiceFlags::PEN_RELEASE);
        kexsvc_holding_pen(&mut st);
        kexsvc_holding_pen(core::ptr::null_mut());
    }

    #[test]
    fn test_holding_pen_requires_stamped_state() {
        let table = entry_points();
        let mut st = ServiceState::new();
        let ret = table.entry(ServiceOp::GetHoldingPen)(&mut st, 0, 0);
        assert_eq!(ret, kexsvc_abi::SVC_ERR_INVAL);
    }
}
