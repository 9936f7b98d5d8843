//! Post-link verification of the code-region contract.
//!
//! These assertions run against the fully linked test image: the marker
//! addresses must bound every function reachable through the published
//! entry-point table. A failure here means the build no longer emits the
//! library as one bounded blob and must not ship.

use kexsvc::entry::kexsvc_holding_pen;
use kexsvc::{code_region, entry_points};
use kexsvc_abi::{SVC_OK, ServiceOp, ServiceState};

#[test]
fn test_markers_are_ordered() {
    let (start, end) = code_region();
    assert!(start < end, "code_start {start:#x} !< code_end {end:#x}");

    let table = entry_points();
    assert_eq!(table.code_start, start);
    assert_eq!(table.code_end, end);
}

#[test]
fn test_every_entry_lies_within_markers() {
    let table = entry_points();
    for (slot, &entry) in table.entry_point.iter().enumerate() {
        let addr = entry as usize;
        assert!(
            table.code_start <= addr && addr < table.code_end,
            "slot {slot} at {addr:#x} outside [{:#x}, {:#x})",
            table.code_start,
            table.code_end,
        );
    }
}

#[test]
fn test_holding_pen_lies_within_markers() {
    let table = entry_points();
    let mut st = ServiceState::new();
    assert_eq!(table.entry(ServiceOp::InitFn)(&mut st, 0, 0), SVC_OK);

    let pen = table.entry(ServiceOp::GetHoldingPen)(&mut st, 0, 0);
    assert!(pen > 0);
    let addr = pen as usize;
    assert_eq!(addr, kexsvc_holding_pen as *const () as usize);
    assert!(table.code_start <= addr && addr < table.code_end);
}

#[test]
fn test_abi_accessor_lies_within_markers() {
    let table = entry_points();
    let addr = kexsvc::entry::kexsvc_get_entry_points as *const () as usize;
    assert!(table.code_start <= addr && addr < table.code_end);
}
