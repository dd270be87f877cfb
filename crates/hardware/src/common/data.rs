//! Memory Access Types.
//!
//! This module defines the classification of memory accesses. Each access
//! kind maps to the page permission bit it requires, which is how the virtual
//! memory and the fetch stage decide whether to raise an access violation.

use std::fmt;

use crate::memory::Permissions;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access.
    ///
    /// Occurs when the fetch stage captures the instruction at `rip`.
    /// Requires Execute (X) permission.
    Fetch,

    /// Data read access.
    ///
    /// Occurs for loads, stack pops, syscall buffers and operand fetches
    /// through the instruction cursor. Requires Read (R) permission.
    Read,

    /// Data write access.
    ///
    /// Occurs for stores, stack pushes and the `read` syscall.
    /// Requires Write (W) permission.
    Write,
}

impl AccessType {
    /// The page permission bit this access requires.
    pub const fn required(self) -> Permissions {
        match self {
            Self::Fetch => Permissions::EXECUTE,
            Self::Read => Permissions::READ,
            Self::Write => Permissions::WRITE,
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fetch => "fetch",
            Self::Read => "read",
            Self::Write => "write",
        };
        f.write_str(s)
    }
}
