//! Virtual address type.
//!
//! The emulated program only ever sees virtual addresses. There is no
//! translation layer: every address is resolved directly against the mapped
//! pages of a [`VirtualMemory`](crate::memory::VirtualMemory).

use std::fmt;

/// A virtual address in the emulated 64-bit address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 64-bit address value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Adds a signed displacement with two's-complement wraparound.
    ///
    /// Branch targets are computed this way: a backwards jump near address
    /// zero wraps to the top of the address space instead of faulting.
    ///
    /// # Arguments
    ///
    /// * `disp` - Signed displacement in bytes.
    #[inline]
    pub const fn wrapping_offset(self, disp: i64) -> Self {
        Self(self.0.wrapping_add_signed(disp))
    }

    /// Returns the address `len` bytes past this one, or `None` on overflow.
    #[inline]
    pub const fn checked_add(self, len: u64) -> Option<Self> {
        match self.0.checked_add(len) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
