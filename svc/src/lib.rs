//! kexsvc — kexec-survivable service library.
//!
//! A kernel-resident manager calls into this library through a versioned
//! entry-point table rather than normal cross-module symbol resolution, so
//! the calls keep working after a kexec handoff moves the code to a new
//! address. Two exported markers bound the library's executable code; the
//! manager relocates `[code_start, code_end)` as one blob and re-enters it
//! directly.
//!
//! # Unit ordering contract
//!
//! The whole library compiles as one unit (`codegen-units = 1` in the
//! workspace profiles). The module order below is the unit's dependency
//! order and is part of the build contract — definitions precede uses, from
//! low-level utilities up to the interface glue:
//!
//! 1. `numfmt`   — stack-only number formatting
//! 2. `svclog`   — logging into the shared-state ring
//! 3. `state`    — checked access to the manager's state block
//! 4. `handlers` — entry-point bodies
//! 5. `entry`    — code-region markers, entry wrappers, table publisher
//!
//! No assembly routines exist in this library; any that are ever added must
//! be compiled separately and must not be assumed to lie inside
//! `[code_start, code_end)`.

#![no_std]

pub mod numfmt;
pub mod svclog;
pub mod state;
pub mod handlers;
pub mod entry;

/// Library revision reported through the entry-point table, independent of
/// the table-layout version.
pub const LIB_VERSION_MAJOR: u32 = 3;
pub const LIB_VERSION_MINOR: u32 = 1;

pub use entry::{code_region, entry_points};
