//! kexsvc Manager-Library ABI Types
//!
//! This crate provides the canonical definitions for everything shared
//! between the kernel-resident manager and the kexsvc service library.
//! Having a single source of truth eliminates:
//! - Duplicate type definitions
//! - ABI mismatches between manager and library
//! - The need for unsafe FFI conversions
//!
//! All types in this crate are `#[repr(C)]` for ABI stability. The table
//! layout and slot indexing are a binary contract: any change to either
//! requires bumping [`EXPECTED_MGR_VERSION`].

#![no_std]
#![forbid(unsafe_code)]

pub mod entry;
pub mod error;
pub mod state;

pub use entry::*;
pub use error::*;
pub use state::*;
