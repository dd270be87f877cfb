//! Paged Virtual Memory.
//!
//! This module implements the emulated address space. It provides:
//! 1. **Page:** A contiguous, permission-tagged byte buffer at a virtual base address.
//! 2. **Virtual Memory:** The set of disjoint pages a program runs against, with
//!    address resolution and permission-checked reads and writes.

/// Permission-tagged pages.
pub mod page;

/// The page set and its access operations.
pub mod virtual_memory;

pub use page::{Page, PageKey, Permissions};
pub use virtual_memory::VirtualMemory;
